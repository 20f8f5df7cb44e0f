//! Tessellation of frame shapes into triangle lists

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::frame::{Color, Fill, Frame, Shape};
use super::vertex::Vertex;
use crate::sim::Rect;

/// Segments for a full circle; arcs and corners use a share of this
const CIRCLE_SEGMENTS: u32 = 24;
const CORNER_SEGMENTS: u32 = 6;

/// Triangles for every shape in the frame, back to front
pub fn tessellate(frame: &Frame) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(frame.shapes.len() * 24);
    for shape in &frame.shapes {
        match *shape {
            Shape::Rect { rect, fill } => match fill {
                Fill::Solid(color) => rect_solid(&mut vertices, &rect, color),
                Fill::Banded { edge, center } => rect_banded(&mut vertices, &rect, edge, center),
            },
            Shape::Line {
                from,
                to,
                width,
                color,
            } => line(&mut vertices, from, to, width, color),
            Shape::RoundedSquare {
                center,
                size,
                corner_radius,
                rotation,
                color,
            } => rounded_square(&mut vertices, center, size, corner_radius, rotation, color),
            Shape::Circle {
                center,
                radius,
                color,
            } => ellipse(
                &mut vertices,
                center,
                Vec2::splat(radius),
                0.0,
                color,
            ),
            Shape::Ellipse {
                center,
                radii,
                rotation,
                color,
            } => ellipse(&mut vertices, center, radii, rotation, color),
        }
    }
    vertices
}

fn quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], colors: [Color; 4]) {
    // corners: top-left, top-right, bottom-right, bottom-left
    let v = |i: usize| Vertex::new(corners[i].x, corners[i].y, colors[i]);
    out.extend_from_slice(&[v(0), v(1), v(2), v(0), v(2), v(3)]);
}

fn rect_solid(out: &mut Vec<Vertex>, rect: &Rect, color: Color) {
    quad(
        out,
        [
            Vec2::new(rect.left, rect.top),
            Vec2::new(rect.right, rect.top),
            Vec2::new(rect.right, rect.bottom),
            Vec2::new(rect.left, rect.bottom),
        ],
        [color; 4],
    );
}

fn rect_banded(out: &mut Vec<Vertex>, rect: &Rect, edge: Color, center: Color) {
    let mid = (rect.left + rect.right) / 2.0;
    let left = Rect::new(rect.left, mid, rect.top, rect.bottom);
    let right = Rect::new(mid, rect.right, rect.top, rect.bottom);
    quad(
        out,
        [
            Vec2::new(left.left, left.top),
            Vec2::new(left.right, left.top),
            Vec2::new(left.right, left.bottom),
            Vec2::new(left.left, left.bottom),
        ],
        [edge, center, center, edge],
    );
    quad(
        out,
        [
            Vec2::new(right.left, right.top),
            Vec2::new(right.right, right.top),
            Vec2::new(right.right, right.bottom),
            Vec2::new(right.left, right.bottom),
        ],
        [center, edge, edge, center],
    );
}

fn line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: Color) {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(
        out,
        [from + perp, to + perp, to - perp, from - perp],
        [color; 4],
    );
}

/// Triangle fan around `center` through `rim` (closed)
fn fan(out: &mut Vec<Vertex>, center: Vec2, rim: &[Vec2], color: Color) {
    for i in 0..rim.len() {
        let a = rim[i];
        let b = rim[(i + 1) % rim.len()];
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(a.x, a.y, color));
        out.push(Vertex::new(b.x, b.y, color));
    }
}

fn ellipse(out: &mut Vec<Vertex>, center: Vec2, radii: Vec2, rotation: f32, color: Color) {
    let turn = Vec2::from_angle(rotation);
    let rim: Vec<Vec2> = (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let theta = i as f32 / CIRCLE_SEGMENTS as f32 * TAU;
            center + turn.rotate(Vec2::new(radii.x * theta.cos(), radii.y * theta.sin()))
        })
        .collect();
    fan(out, center, &rim, color);
}

fn rounded_square(
    out: &mut Vec<Vertex>,
    center: Vec2,
    size: f32,
    corner_radius: f32,
    rotation: f32,
    color: Color,
) {
    let half = size / 2.0;
    let r = corner_radius.clamp(0.0, half);
    let inner = half - r;
    let turn = Vec2::from_angle(rotation);

    // Corner arc centres, clockwise on screen starting bottom-right
    let corners = [
        (Vec2::new(inner, inner), 0.0),
        (Vec2::new(-inner, inner), FRAC_PI_2),
        (Vec2::new(-inner, -inner), PI),
        (Vec2::new(inner, -inner), PI + FRAC_PI_2),
    ];
    let mut rim = Vec::with_capacity(corners.len() * (CORNER_SEGMENTS as usize + 1));
    for (corner, start) in corners {
        for step in 0..=CORNER_SEGMENTS {
            let theta = start + step as f32 / CORNER_SEGMENTS as f32 * FRAC_PI_2;
            let local = corner + Vec2::new(theta.cos(), theta.sin()) * r;
            rim.push(center + turn.rotate(local));
        }
    }
    fan(out, center, &rim, color);
}

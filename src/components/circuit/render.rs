use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scene::{GRID_SPACING, NodeKind};
use super::state::CircuitState;

fn rgba((r, g, b): (u8, u8, u8), alpha: f64) -> String {
	format!("rgba({}, {}, {}, {})", r, g, b, alpha)
}

pub fn render(state: &CircuitState, ctx: &CanvasRenderingContext2d, now_ms: f64) {
	draw_background(state, ctx);
	draw_traces(state, ctx);
	draw_nodes(state, ctx);
	draw_packets(state, ctx);
	draw_sparks(state, ctx);
	draw_scanline(state, ctx, now_ms);
}

fn draw_background(state: &CircuitState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(&rgba(state.palette.background, 1.0));
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	// Alignment grid, barely above the background.
	ctx.set_stroke_style_str(&rgba(state.palette.secondary, 0.02));
	ctx.set_line_width(1.0);
	let mut x = 0.0;
	while x <= state.width {
		ctx.begin_path();
		ctx.move_to(x, 0.0);
		ctx.line_to(x, state.height);
		ctx.stroke();
		x += GRID_SPACING;
	}
	let mut y = 0.0;
	while y <= state.height {
		ctx.begin_path();
		ctx.move_to(0.0, y);
		ctx.line_to(state.width, y);
		ctx.stroke();
		y += GRID_SPACING;
	}
}

fn trace_path(ctx: &CanvasRenderingContext2d, path: &[(f64, f64); 3]) {
	ctx.begin_path();
	ctx.move_to(path[0].0, path[0].1);
	ctx.line_to(path[1].0, path[1].1);
	ctx.line_to(path[2].0, path[2].1);
}

fn draw_traces(state: &CircuitState, ctx: &CanvasRenderingContext2d) {
	for trace in &state.scene.traces {
		if !trace.active {
			continue;
		}
		// Wide soft pass under a crisp line reads as a glow without any
		// shadow-blur cost.
		ctx.set_stroke_style_str(&rgba(state.palette.secondary, 0.05 * trace.glow));
		ctx.set_line_width(3.0);
		trace_path(ctx, &trace.path);
		ctx.stroke();

		ctx.set_stroke_style_str(&rgba(state.palette.secondary, 0.35 * trace.glow));
		ctx.set_line_width(1.0);
		trace_path(ctx, &trace.path);
		ctx.stroke();
	}
}

fn draw_nodes(state: &CircuitState, ctx: &CanvasRenderingContext2d) {
	for node in &state.scene.nodes {
		let intensity = 0.5 + 0.5 * node.phase.cos();
		let alpha = 0.25 + 0.55 * intensity;
		let s = node.size;

		match node.kind {
			NodeKind::Processor => {
				ctx.set_stroke_style_str(&rgba(state.palette.primary, alpha));
				ctx.set_line_width(1.0);
				ctx.stroke_rect(node.x - s, node.y - s, s * 2.0, s * 2.0);
				ctx.stroke_rect(node.x - s * 0.5, node.y - s * 0.5, s, s);
				ctx.set_fill_style_str(&rgba(state.palette.primary, alpha));
				ctx.fill_rect(node.x - 1.0, node.y - 1.0, 2.0, 2.0);
			}
			NodeKind::Junction => {
				// Only junctions carry the radial halo once lit.
				if node.active {
					let glow_radius = s * 3.0;
					if let Ok(gradient) = ctx
						.create_radial_gradient(node.x, node.y, s * 0.3, node.x, node.y, glow_radius)
					{
						let _ =
							gradient.add_color_stop(0.0, &rgba(state.palette.glow, 0.35 * intensity));
						let _ = gradient.add_color_stop(1.0, &rgba(state.palette.glow, 0.0));
						ctx.begin_path();
						let _ = ctx.arc(node.x, node.y, glow_radius, 0.0, 2.0 * PI);
						#[allow(deprecated)]
						ctx.set_fill_style(&gradient);
						ctx.fill();
					}
				}
				ctx.begin_path();
				ctx.move_to(node.x, node.y - s);
				ctx.line_to(node.x + s, node.y);
				ctx.line_to(node.x, node.y + s);
				ctx.line_to(node.x - s, node.y);
				ctx.close_path();
				ctx.set_fill_style_str(&rgba(state.palette.primary, alpha));
				ctx.fill();
			}
			NodeKind::Terminal => {
				ctx.begin_path();
				let _ = ctx.arc(node.x, node.y, s, 0.0, 2.0 * PI);
				ctx.set_stroke_style_str(&rgba(state.palette.primary, alpha));
				ctx.set_line_width(1.5);
				ctx.stroke();
				if node.active {
					ctx.begin_path();
					let _ = ctx.arc(node.x, node.y, s * 0.45, 0.0, 2.0 * PI);
					ctx.set_fill_style_str(&rgba(state.palette.glow, alpha));
					ctx.fill();
				}
			}
		}
	}
}

fn draw_packets(state: &CircuitState, ctx: &CanvasRenderingContext2d) {
	for packet in &state.packets {
		for pair in packet.trail.windows(2) {
			ctx.set_stroke_style_str(&rgba(packet.color, pair[1].alpha));
			ctx.set_line_width(packet.size * 0.8);
			ctx.begin_path();
			ctx.move_to(pair[0].x, pair[0].y);
			ctx.line_to(pair[1].x, pair[1].y);
			ctx.stroke();
		}

		let (x, y) = state.position_between(packet.current, packet.target, packet.progress);
		let glow_radius = packet.size * 4.0;
		if let Ok(gradient) = ctx.create_radial_gradient(x, y, 0.0, x, y, glow_radius) {
			let _ = gradient.add_color_stop(0.0, &rgba(packet.color, 0.9));
			let _ = gradient.add_color_stop(0.4, &rgba(packet.color, 0.35));
			let _ = gradient.add_color_stop(1.0, &rgba(packet.color, 0.0));
			ctx.begin_path();
			let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, packet.size * 0.6, 0.0, 2.0 * PI);
		ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
		ctx.fill();
	}
}

fn draw_sparks(state: &CircuitState, ctx: &CanvasRenderingContext2d) {
	for spark in &state.sparks {
		let fraction = 1.0 - spark.life as f64 / spark.max_life as f64;
		ctx.begin_path();
		let _ = ctx.arc(spark.x, spark.y, spark.size * fraction, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&rgba(state.palette.glow, 0.8 * fraction));
		ctx.fill();
	}
}

fn draw_scanline(state: &CircuitState, ctx: &CanvasRenderingContext2d, now_ms: f64) {
	let band = 90.0;
	let y = (now_ms * 0.05) % (state.height + band) - band;
	let gradient = ctx.create_linear_gradient(0.0, y, 0.0, y + band);
	let _ = gradient.add_color_stop(0.0, &rgba(state.palette.glow, 0.0));
	let _ = gradient.add_color_stop(0.5, &rgba(state.palette.glow, 0.04));
	let _ = gradient.add_color_stop(1.0, &rgba(state.palette.glow, 0.0));
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, y, state.width, band);
}

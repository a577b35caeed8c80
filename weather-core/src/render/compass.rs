use super::scene::{Anchor, Canvas, Point};

/// Compass points after "N", clockwise; each covers 22.5 degrees.
const POINTS: [&str; 14] = [
    "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
];

const ARC: f64 = 22.5;

/// Name of the 16-point compass arc containing `degrees`.
///
/// "N" straddles north (`>= 337.5` or `< 22.5`); every other arc is the
/// half-open range `[lower, lower + 22.5)`. Only values that fall through
/// every comparison (NaN) are "Unknown".
pub fn cardinal_name(degrees: f64) -> &'static str {
    if degrees >= 337.5 || degrees < ARC {
        return "N";
    }
    for (i, name) in POINTS.iter().enumerate() {
        if degrees < ARC * (i + 2) as f64 {
            return name;
        }
    }
    "Unknown"
}

/// Draw the rose: circle, N/E/S/W ticks and labels, then the wind arrow.
///
/// The arrow points where the wind blows to. Only the arrow is drawn inside
/// the rotated frame; labels and circle stay upright for every direction.
pub fn draw_compass_rose(canvas: &mut Canvas, center: Point, radius: f32, wind_direction_deg: f64) {
    // At a radius of 20: labels at 24, ticks down to 18, shaft 17.5, head 5.
    let label = radius + radius / 5.0;
    let tick = radius - radius / 10.0;

    canvas.push();
    canvas.translate(center.x, center.y);

    canvas.draw_circle(0.0, 0.0, radius);

    canvas.draw_text_anchored("N", 0.0, -label, Anchor::new(0.5, 0.0));
    canvas.draw_line(0.0, -radius, 0.0, -tick);
    canvas.draw_text_anchored("E", label, 0.0, Anchor::new(0.0, 0.5));
    canvas.draw_line(radius, 0.0, tick, 0.0);
    canvas.draw_text_anchored("S", 0.0, label, Anchor::new(0.5, 1.0));
    canvas.draw_line(0.0, radius, 0.0, tick);
    canvas.draw_text_anchored("W", -label, 0.0, Anchor::new(1.0, 0.5));
    canvas.draw_line(-radius, 0.0, -tick, 0.0);

    canvas.push();
    canvas.rotate(wind_direction_deg.to_radians() as f32);

    let shaft = radius * 0.875;
    let head = radius / 4.0;
    canvas.draw_line(0.0, -shaft, 0.0, shaft);
    canvas.draw_line(0.0, shaft, head, shaft - head);
    canvas.draw_line(0.0, shaft, -head, shaft - head);

    canvas.pop();
    canvas.pop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::scene::{DrawCommand, Scene};

    #[test]
    fn examples_from_each_boundary() {
        assert_eq!(cardinal_name(0.0), "N");
        assert_eq!(cardinal_name(359.9), "N");
        assert_eq!(cardinal_name(22.5), "NNE");
        assert_eq!(cardinal_name(180.0), "S");
        assert_eq!(cardinal_name(337.4), "NW");
        assert_eq!(cardinal_name(337.5), "N");
        assert_eq!(cardinal_name(22.4), "N");
        assert_eq!(cardinal_name(90.0), "E");
        assert_eq!(cardinal_name(270.0), "W");
        assert_eq!(cardinal_name(315.0), "NW");
        assert_eq!(cardinal_name(314.9), "WNW");
    }

    #[test]
    fn boundary_belongs_to_the_arc_starting_there() {
        let expected = [
            "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
            "NW",
        ];
        for (i, name) in expected.iter().enumerate().skip(1) {
            assert_eq!(cardinal_name(22.5 * i as f64), *name, "at {}", 22.5 * i as f64);
        }
    }

    #[test]
    fn total_over_the_circle() {
        let labels = [
            "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
            "NW",
        ];
        for tenth in 0..3600 {
            let d = tenth as f64 / 10.0;
            let name = cardinal_name(d);
            assert!(labels.contains(&name), "{d} -> {name}");
            assert_eq!(name, cardinal_name(d));
        }
    }

    #[test]
    fn nan_is_unknown() {
        assert_eq!(cardinal_name(f64::NAN), "Unknown");
    }

    fn rose(direction: f64) -> Scene {
        let mut canvas = Canvas::new(300, 300);
        draw_compass_rose(&mut canvas, Point::new(265.0, 190.0), 20.0, direction);
        canvas.finish()
    }

    /// Everything except the three arrow strokes, which are drawn last.
    fn static_part(scene: &Scene) -> &[DrawCommand] {
        &scene.commands[..scene.commands.len() - 3]
    }

    fn arrow_tip(scene: &Scene) -> Point {
        match &scene.commands[scene.commands.len() - 3] {
            DrawCommand::Line { to, .. } => *to,
            other => panic!("expected shaft line, got {other:?}"),
        }
    }

    #[test]
    fn labels_and_circle_ignore_wind_direction() {
        let north = rose(0.0);
        for direction in [90.0, 270.0, 123.4] {
            let other = rose(direction);
            assert_eq!(static_part(&north), static_part(&other), "direction {direction}");
        }
    }

    #[test]
    fn labels_sit_outside_the_circle_on_the_axes() {
        let scene = rose(45.0);
        let at = |label: &str| match scene.texts(label).next() {
            Some(DrawCommand::Text { at, .. }) => *at,
            _ => panic!("label {label} missing"),
        };

        assert_eq!(at("N"), Point::new(265.0, 166.0));
        assert_eq!(at("S"), Point::new(265.0, 214.0));
        assert_eq!(at("E"), Point::new(289.0, 190.0));
        assert_eq!(at("W"), Point::new(241.0, 190.0));
    }

    #[test]
    fn arrow_rotates_with_direction() {
        let close = |a: Point, b: Point| (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3;

        // Wind from the north blows south.
        assert!(close(arrow_tip(&rose(0.0)), Point::new(265.0, 207.5)));
        // Wind from the east blows west.
        assert!(close(arrow_tip(&rose(90.0)), Point::new(247.5, 190.0)));
        // Wind from the west blows east.
        assert!(close(arrow_tip(&rose(270.0)), Point::new(282.5, 190.0)));
    }

    #[test]
    fn one_circle_seven_lines_four_labels() {
        let scene = rose(10.0);
        let circles = scene
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count();
        let lines = scene
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        let texts = scene
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
            .count();

        assert_eq!((circles, lines, texts), (1, 7, 4));
    }
}

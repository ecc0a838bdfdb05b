use eframe::egui;

/// Pan/zoom state of the canvas. Screen positions are relative to the
/// canvas' top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTransform {
    pan_screen: egui::Vec2,
    zoom: f32,
    size: egui::Vec2,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            pan_screen: egui::Vec2::ZERO,
            zoom: 1.0,
            size: egui::Vec2::ZERO,
        }
    }
}

impl ViewportTransform {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> egui::Vec2 {
        self.pan_screen
    }

    pub fn size(&self) -> egui::Vec2 {
        self.size
    }

    pub fn set_size(&mut self, size: egui::Vec2) {
        self.size = size;
    }

    pub fn screen_center(&self) -> egui::Pos2 {
        (self.size * 0.5).to_pos2()
    }

    pub fn diagram_to_screen(&self, world: egui::Pos2) -> egui::Pos2 {
        (self.pan_screen + world.to_vec2() * self.zoom).to_pos2()
    }

    pub fn screen_to_diagram(&self, screen: egui::Pos2) -> egui::Pos2 {
        ((screen.to_vec2() - self.pan_screen) / self.zoom).to_pos2()
    }

    pub fn pan_by(&mut self, delta_screen: egui::Vec2) {
        self.pan_screen += delta_screen;
    }

    /// Multiplies the zoom by `zoom_delta` (clamped to `min..=max`) keeping
    /// the diagram point under `screen_point` fixed.
    pub fn zoom_about_screen_point(
        &mut self,
        screen_point: egui::Pos2,
        zoom_delta: f32,
        min: f32,
        max: f32,
    ) {
        let before = self.screen_to_diagram(screen_point);
        self.zoom = (self.zoom * zoom_delta).clamp(min, max);
        let after_screen = self.diagram_to_screen(before);
        self.pan_screen += screen_point - after_screen;
    }

    /// Fits `bounds` grown by `padding` into the viewport, preserving aspect
    /// ratio, with the zoom kept within `min..=max`. The bounds' center lands
    /// on the viewport center even when clamping prevents a full fit. With
    /// nothing to fit, the origin is centered at unit zoom (clamped likewise).
    pub fn fit(&mut self, bounds: Option<egui::Rect>, padding: f32, min: f32, max: f32) {
        let center = self.screen_center().to_vec2();
        let padded = bounds.map(|b| b.expand(padding));
        match padded {
            Some(b) if b.width() > 0.0 && b.height() > 0.0 && self.size.min_elem() > 0.0 => {
                let fitted = (self.size.x / b.width()).min(self.size.y / b.height());
                self.zoom = fitted.clamp(min, max);
                self.pan_screen = center - b.center().to_vec2() * self.zoom;
            }
            _ => {
                self.zoom = 1.0_f32.clamp(min, max);
                self.pan_screen = center;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> ViewportTransform {
        let mut view = ViewportTransform::default();
        view.set_size(egui::vec2(800.0, 600.0));
        view.fit(None, 100.0, 0.1, 8.0);
        view
    }

    #[test]
    fn empty_fit_centers_origin_at_unit_zoom() {
        let view = viewport();
        assert_eq!(view.zoom(), 1.0);
        assert_eq!(view.diagram_to_screen(egui::Pos2::ZERO), egui::pos2(400.0, 300.0));
    }

    #[test]
    fn screen_and_diagram_round_trip() {
        let mut view = viewport();
        view.pan_by(egui::vec2(13.0, -7.0));
        view.zoom_about_screen_point(egui::pos2(10.0, 10.0), 2.0, 0.1, 8.0);
        let p = egui::pos2(-42.5, 17.25);
        let back = view.screen_to_diagram(view.diagram_to_screen(p));
        assert!((back - p).length() < 1e-3);
    }

    #[test]
    fn zoom_keeps_anchor_under_pointer() {
        let mut view = viewport();
        let anchor = egui::pos2(620.0, 140.0);
        let under = view.screen_to_diagram(anchor);
        view.zoom_about_screen_point(anchor, 1.15, 0.1, 8.0);
        view.zoom_about_screen_point(anchor, 1.15, 0.1, 8.0);
        assert!((view.zoom() - 1.3225).abs() < 1e-5);
        let after = view.diagram_to_screen(under);
        assert!((after - anchor).length() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = viewport();
        for _ in 0..100 {
            view.zoom_about_screen_point(egui::pos2(0.0, 0.0), 1.5, 0.1, 8.0);
        }
        assert_eq!(view.zoom(), 8.0);
    }

    #[test]
    fn fit_preserves_aspect_ratio() {
        let mut view = viewport();
        let bounds = egui::Rect::from_min_max(egui::pos2(-225.0, -125.0), egui::pos2(225.0, 125.0));
        view.fit(Some(bounds), 100.0, 0.1, 8.0);
        // padded box is 650 x 450; width is the limiting side
        assert!((view.zoom() - 800.0 / 650.0).abs() < 1e-5);
        let c = view.diagram_to_screen(egui::Pos2::ZERO);
        assert!((c - egui::pos2(400.0, 300.0)).length() < 1e-3);
        let left = view.diagram_to_screen(egui::pos2(-325.0, 0.0));
        assert!(left.x.abs() < 1e-3);
    }

    #[test]
    fn fit_respects_zoom_limits() {
        let mut view = viewport();
        let huge = egui::Rect::from_min_max(egui::pos2(-50_000.0, -50_000.0), egui::pos2(50_000.0, 50_000.0));
        view.fit(Some(huge), 100.0, 0.1, 8.0);
        assert_eq!(view.zoom(), 0.1);
        let c = view.diagram_to_screen(egui::Pos2::ZERO);
        assert!((c - egui::pos2(400.0, 300.0)).length() < 1e-3);

        // a wheel step from the clamped fit multiplies normally
        view.zoom_about_screen_point(egui::pos2(400.0, 300.0), 1.15, 0.1, 8.0);
        assert!((view.zoom() - 0.115).abs() < 1e-6);

        let tiny = egui::Rect::from_center_size(egui::Pos2::ZERO, egui::vec2(2.0, 2.0));
        view.fit(Some(tiny), 1.0, 0.1, 8.0);
        assert_eq!(view.zoom(), 8.0);
    }
}

use crate::panel::Panel;

/// Surface lengths and wetted areas of the wing section.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WingMetrics {
    pub span: f64,
    pub top_length: f64,
    pub bottom_length: f64,
    pub top_area: f64,
    pub bottom_area: f64,
    pub total_area: f64,
}

impl WingMetrics {
    /// Sum panel lengths per surface and extrude them over `span`.
    pub fn accumulate<'a, I>(panels: I, span: f64) -> Self
    where
        I: IntoIterator<Item = &'a Panel>,
    {
        let (top_length, bottom_length) =
            panels.into_iter().fold((0.0, 0.0), |(top, bottom), panel| {
                if panel.on_bottom {
                    (top, bottom + panel.length)
                } else {
                    (top + panel.length, bottom)
                }
            });

        let top_area = top_length * span;
        let bottom_area = bottom_length * span;

        Self {
            span,
            top_length,
            bottom_length,
            top_area,
            bottom_area,
            total_area: top_area + bottom_area,
        }
    }
}

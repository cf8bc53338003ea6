use super::ItemKind;
use crate::geometry::Size;
use crate::style::ResolvedStyle;

/// A renderable handle owned by the host. The core only asks for its natural
/// size and tells it the size it was given.
pub trait ItemView {
    fn measure(&self) -> Size;
    fn update_dimension(&mut self, width: u32, height: u32);
}

/// Creates views for item builders. Returning `None` aborts the build pass.
pub trait ViewProvider {
    fn inflate(
        &mut self,
        index: usize,
        kind: &ItemKind,
        style: &ResolvedStyle,
    ) -> Option<Box<dyn ItemView>>;
}

/// A view with a fixed natural size, for headless hosts.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredView {
    natural: Size,
    dimension: Option<(u32, u32)>,
}

impl MeasuredView {
    pub fn new(natural: Size) -> Self {
        Self {
            natural,
            dimension: None,
        }
    }
}

impl ItemView for MeasuredView {
    /// The assigned dimension once there is one, the natural size before.
    fn measure(&self) -> Size {
        self.dimension
            .map(|(w, h)| Size::new(w as f64, h as f64))
            .unwrap_or(self.natural)
    }

    fn update_dimension(&mut self, width: u32, height: u32) {
        self.dimension = Some((width, height));
    }
}

/// Hands out [`MeasuredView`]s by item index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasuredViews {
    sizes: Vec<Size>,
    fallback: Option<Size>,
}

impl MeasuredViews {
    pub fn new(sizes: Vec<Size>) -> Self {
        Self {
            sizes,
            fallback: None,
        }
    }

    /// Every item measures `size`.
    pub fn uniform(size: Size) -> Self {
        Self {
            sizes: Vec::new(),
            fallback: Some(size),
        }
    }
}

impl ViewProvider for MeasuredViews {
    fn inflate(
        &mut self,
        index: usize,
        _kind: &ItemKind,
        _style: &ResolvedStyle,
    ) -> Option<Box<dyn ItemView>> {
        self.sizes
            .get(index)
            .copied()
            .or(self.fallback)
            .map(|size| Box::new(MeasuredView::new(size)) as Box<dyn ItemView>)
    }
}

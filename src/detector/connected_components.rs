/// Connected component labelling inside a pixel window.
/// Dark and light pixels are both labelled (8-connectivity) and every component
/// records which components of the opposite colour it touches.
use std::collections::BTreeSet;

use crate::models::{BinaryImage, Point, Rect};

/// One 8-connected region of equal colour
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Colour of the region
    pub dark: bool,
    /// Number of pixels
    pub area: usize,
    /// Labels of the 4-adjacent components (always of the opposite colour)
    pub neighbors: BTreeSet<usize>,
    /// Whether the region reaches the window edge
    pub touches_border: bool,
    sum_x: usize,
    sum_y: usize,
}

impl Component {
    fn new(dark: bool) -> Self {
        Self {
            dark,
            area: 0,
            neighbors: BTreeSet::new(),
            touches_border: false,
            sum_x: 0,
            sum_y: 0,
        }
    }

    /// Mean pixel position in image coordinates
    pub fn centroid(&self) -> Point {
        let n = self.area.max(1) as f64;
        Point::new(self.sum_x as f64 / n, self.sum_y as f64 / n)
    }
}

/// Labelled window: one label per pixel plus the component list
#[derive(Debug, Clone)]
pub struct ComponentMap {
    rect: Rect,
    labels: Vec<usize>,
    components: Vec<Component>,
}

impl ComponentMap {
    /// Label every pixel of `rect` (already clipped to the image).
    ///
    /// Flood fill uses an explicit stack, so large uniform windows cannot
    /// exhaust the call stack.
    pub fn label(image: &BinaryImage, rect: Rect) -> Self {
        const UNLABELLED: usize = usize::MAX;
        let (w, h) = (rect.width, rect.height);
        let dark_at = |x: usize, y: usize| image.is_dark(rect.x + x, rect.y + y);
        let mut labels = vec![UNLABELLED; w * h];
        let mut components = Vec::new();
        let mut stack = Vec::new();

        for sy in 0..h {
            for sx in 0..w {
                if labels[sy * w + sx] != UNLABELLED {
                    continue;
                }
                let id = components.len();
                let dark = dark_at(sx, sy);
                let mut component = Component::new(dark);
                labels[sy * w + sx] = id;
                stack.push((sx, sy));

                while let Some((x, y)) = stack.pop() {
                    component.area += 1;
                    component.sum_x += rect.x + x;
                    component.sum_y += rect.y + y;
                    for ny in y.saturating_sub(1)..(y + 2).min(h) {
                        for nx in x.saturating_sub(1)..(x + 2).min(w) {
                            if labels[ny * w + nx] == UNLABELLED && dark_at(nx, ny) == dark {
                                labels[ny * w + nx] = id;
                                stack.push((nx, ny));
                            }
                        }
                    }
                }
                components.push(component);
            }
        }

        // Adjacency from right and down pairs covers every 4-adjacent pair once.
        for y in 0..h {
            for x in 0..w {
                let id = labels[y * w + x];
                if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                    components[id].touches_border = true;
                }
                let right = (x + 1 < w).then(|| labels[y * w + x + 1]);
                let down = (y + 1 < h).then(|| labels[(y + 1) * w + x]);
                for other in [right, down].into_iter().flatten() {
                    if other != id {
                        components[id].neighbors.insert(other);
                        components[other].neighbors.insert(id);
                    }
                }
            }
        }

        Self {
            rect,
            labels,
            components,
        }
    }

    /// Window that was labelled
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// All components, indexed by label
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Label of an image pixel inside the window
    pub fn label_at(&self, x: usize, y: usize) -> Option<usize> {
        self.rect
            .contains(x, y)
            .then(|| self.labels[(y - self.rect.y) * self.rect.width + x - self.rect.x])
    }
}

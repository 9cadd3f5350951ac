use kurbo::{Circle, Shape};

use crate::{
    composite,
    engine::DotPrimitive,
    error::{ScreentoneError, ScreentoneResult},
};

/// One rendered raster, premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct RasterRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl RasterRGBA {
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
            premultiplied: true,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

/// Draw one layer's dots as opaque filled circles of the layer color onto a
/// transparent surface.
pub fn rasterize_dots(
    width: u32,
    height: u32,
    rgb: [u8; 3],
    dots: &[DotPrimitive],
) -> ScreentoneResult<RasterRGBA> {
    let width_u16: u16 = width
        .try_into()
        .map_err(|_| ScreentoneError::render("raster width exceeds u16"))?;
    let height_u16: u16 = height
        .try_into()
        .map_err(|_| ScreentoneError::render("raster height exceeds u16"))?;
    if width == 0 || height == 0 {
        return Err(ScreentoneError::render("raster dimensions must be > 0"));
    }

    let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
    let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(rgb[0], rgb[1], rgb[2], 255));

    for dot in dots {
        let circle = Circle::new(dot.center, dot.diameter / 2.0);
        ctx.fill_path(&circle_to_cpu(&circle));
    }

    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    Ok(RasterRGBA {
        width,
        height,
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    })
}

/// Merge already-rendered layer rasters, back to front, onto a transparent
/// surface. The caller decides the order; this function just paints.
pub fn merge_back_to_front(
    width: u32,
    height: u32,
    layers: &[&RasterRGBA],
) -> ScreentoneResult<RasterRGBA> {
    let mut merged = RasterRGBA::transparent(width, height);
    for layer in layers {
        if layer.width != width || layer.height != height {
            return Err(ScreentoneError::render(
                "layer raster does not match merged raster dimensions",
            ));
        }
        composite::over_in_place(&mut merged.data, &layer.data)?;
    }
    Ok(merged)
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn circle_to_cpu(circle: &Circle) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in circle.path_elements(0.1) {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn dot(x: f64, y: f64, diameter: f64) -> DotPrimitive {
        DotPrimitive {
            center: Point::new(x, y),
            diameter,
        }
    }

    #[test]
    fn empty_dot_list_renders_transparent() {
        let raster = rasterize_dots(8, 8, [255, 0, 0], &[]).unwrap();
        assert!(raster.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn dot_center_is_fully_covered() {
        let raster = rasterize_dots(32, 32, [238, 29, 38], &[dot(16.0, 16.0, 20.0)]).unwrap();
        assert_eq!(raster.pixel(16, 16), [238, 29, 38, 255]);
        assert_eq!(raster.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn rasterize_is_deterministic() {
        let dots = [dot(5.0, 5.0, 6.0), dot(10.5, 3.25, 2.5)];
        let a = rasterize_dots(16, 16, [0, 0, 0], &dots).unwrap();
        let b = rasterize_dots(16, 16, [0, 0, 0], &dots).unwrap();
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn merge_paints_later_layers_on_top() {
        let bottom = rasterize_dots(16, 16, [0, 0, 255], &[dot(8.0, 8.0, 12.0)]).unwrap();
        let top = rasterize_dots(16, 16, [255, 0, 0], &[dot(8.0, 8.0, 6.0)]).unwrap();

        let merged = merge_back_to_front(16, 16, &[&bottom, &top]).unwrap();
        assert_eq!(merged.pixel(8, 8), [255, 0, 0, 255]);
        // Outside the top dot the bottom layer shows through.
        assert_eq!(merged.pixel(8, 12), [0, 0, 255, 255]);
    }

    #[test]
    fn merge_rejects_mismatched_dimensions() {
        let a = RasterRGBA::transparent(8, 8);
        let b = RasterRGBA::transparent(9, 8);
        assert!(merge_back_to_front(8, 8, &[&a, &b]).is_err());
    }
}

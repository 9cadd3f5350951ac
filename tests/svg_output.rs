use screentone::{
    HalftoneParams, Layer, Palette, RenderRequest, SourceImage, ToleranceBand, render_export,
};

fn request() -> RenderRequest {
    let palette = Palette::builtin();
    let mut layers = Vec::new();
    for hex in ["#ee1d26", "#f2ed3a"] {
        let mut layer = Layer::new(palette.find(hex).unwrap().clone());
        layer.custom_enabled = true;
        layer.tolerance = ToleranceBand::new(0, 765);
        layer.halftone = HalftoneParams {
            dot_scale: 1.0,
            min_dot_size: 1.0,
            max_dot_size: 3.0,
            randomness_percent: 0,
        };
        layers.push(layer);
    }
    RenderRequest::new(layers)
}

fn count_paths(group: &usvg::Group) -> usize {
    let mut n = 0;
    for child in group.children() {
        match child {
            usvg::Node::Group(g) => n += count_paths(g.as_ref()),
            usvg::Node::Path(_) => n += 1,
            _ => {}
        }
    }
    n
}

#[test]
fn layer_documents_parse_and_carry_one_path_per_dot() {
    let src = SourceImage::from_rgb8(8, 8, vec![100; 8 * 8 * 3]).unwrap();
    let export = render_export(&src, &request()).unwrap();

    for (layer, doc) in export.raster.layers.iter().zip(&export.layer_vectors) {
        assert!(!layer.dots.is_empty());

        let svg = doc.to_svg_string();
        let opts = usvg::Options::default();
        let tree = usvg::Tree::from_data(svg.as_bytes(), &opts).unwrap();

        assert_eq!(tree.size().width(), 8.0);
        assert_eq!(tree.size().height(), 8.0);
        assert_eq!(count_paths(tree.root()), layer.dots.len());
    }
}

#[test]
fn merged_document_parses_with_every_layer_included() {
    let src = SourceImage::from_rgb8(8, 8, vec![100; 8 * 8 * 3]).unwrap();
    let export = render_export(&src, &request()).unwrap();

    let svg = export.merged_vector.to_svg_string();
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(svg.as_bytes(), &opts).unwrap();

    let total: usize = export.raster.layers.iter().map(|l| l.dots.len()).sum();
    assert_eq!(count_paths(tree.root()), total);
}

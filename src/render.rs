use std::collections::BTreeSet;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::{
    engine::{self, DotPrimitive},
    error::{ScreentoneError, ScreentoneResult},
    palette::PaletteColor,
    params::{Layer, ResolvedLayer, SessionDefaults},
    raster::{self, RasterRGBA},
    source::SourceImage,
    vector::VectorDocument,
};

/// Everything one render pass needs, captured up front. The engine never
/// reads ambient state: callers snapshot their UI/session state into this
/// value and hand it over.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RenderRequest {
    /// Selected layers in *selection* order. The merged vector document
    /// groups colors in this order.
    pub layers: Vec<Layer>,
    /// Z-order over the same colors: index 0 is the front (topmost) layer.
    /// Rasters composite in `paint order = reverse(front_to_back)`, so the
    /// front layer is painted last. Do not "fix" the inversion.
    pub front_to_back: Vec<String>,
    #[serde(default)]
    pub defaults: SessionDefaults,
    /// Determinism seed for randomized dot sizing.
    #[serde(default)]
    pub seed: u64,
}

impl RenderRequest {
    /// A request with every layer in selection order and no overrides.
    pub fn new(layers: Vec<Layer>) -> Self {
        let front_to_back = layers.iter().map(|l| l.color.hex.clone()).collect();
        Self {
            layers,
            front_to_back,
            defaults: SessionDefaults::default(),
            seed: 0,
        }
    }

    pub fn validate(&self) -> ScreentoneResult<()> {
        let mut seen = BTreeSet::new();
        for layer in &self.layers {
            if !seen.insert(layer.color.hex.as_str()) {
                return Err(ScreentoneError::validation(format!(
                    "color '{}' appears in more than one layer",
                    layer.color.hex
                )));
            }
        }
        if self.front_to_back.len() != self.layers.len() {
            return Err(ScreentoneError::validation(
                "front_to_back must list each selected color exactly once",
            ));
        }
        let mut ordered = BTreeSet::new();
        for hex in &self.front_to_back {
            if !seen.contains(hex.as_str()) {
                return Err(ScreentoneError::validation(format!(
                    "front_to_back color '{hex}' is not a selected layer"
                )));
            }
            if !ordered.insert(hex.as_str()) {
                return Err(ScreentoneError::validation(format!(
                    "front_to_back lists color '{hex}' twice"
                )));
            }
        }
        Ok(())
    }

    fn resolve_layers(&self) -> ScreentoneResult<Vec<ResolvedLayer>> {
        self.layers
            .iter()
            .map(|l| l.resolve(&self.defaults))
            .collect()
    }

    /// Indices into `layers`, back to front: the actual paint sequence.
    fn paint_order(&self) -> Vec<usize> {
        self.front_to_back
            .iter()
            .rev()
            .filter_map(|hex| self.layers.iter().position(|l| &l.color.hex == hex))
            .collect()
    }
}

/// One layer's output within a render pass.
#[derive(Clone, Debug)]
pub struct LayerRender {
    pub color: PaletteColor,
    pub dots: Vec<DotPrimitive>,
    pub raster: RasterRGBA,
}

/// A preview render: per-layer rasters plus the merged raster, all sized to
/// the source image. Rebuilt from scratch on every call.
#[derive(Clone, Debug)]
pub struct RenderResult {
    pub width: u32,
    pub height: u32,
    /// Selection order, matching `RenderRequest::layers`.
    pub layers: Vec<LayerRender>,
    pub merged: RasterRGBA,
}

/// An export render: rasters plus the vector mirror, all driven by one
/// primitive stream per layer.
#[derive(Clone, Debug)]
pub struct ExportResult {
    pub raster: RenderResult,
    /// One single-group document per layer, selection order.
    pub layer_vectors: Vec<VectorDocument>,
    /// One group per selected color, in selection order (which may differ
    /// from the raster z-order; preserved behavior).
    pub merged_vector: VectorDocument,
}

/// Render the raster preview: separate each layer, then composite in paint
/// order. An empty layer set is a normal state and yields an empty result
/// over a transparent merged raster.
#[tracing::instrument(skip(source, request))]
pub fn render_preview(
    source: &SourceImage,
    request: &RenderRequest,
) -> ScreentoneResult<RenderResult> {
    request.validate()?;
    let resolved = request.resolve_layers()?;
    let mut rng = SmallRng::seed_from_u64(request.seed);
    render_raster_pass(source, request, &resolved, &mut rng)
}

/// Render for export: a fresh separation run per layer feeds both the raster
/// buffers and the vector documents, so raster and vector geometry within
/// this pass are identical. Randomized renders only match an earlier preview
/// when `randomness_percent` is 0.
#[tracing::instrument(skip(source, request))]
pub fn render_export(
    source: &SourceImage,
    request: &RenderRequest,
) -> ScreentoneResult<ExportResult> {
    request.validate()?;
    let resolved = request.resolve_layers()?;
    let mut rng = SmallRng::seed_from_u64(request.seed);

    let raster_result = render_raster_pass(source, request, &resolved, &mut rng)?;

    let (width, height) = (raster_result.width, raster_result.height);
    let mut merged_vector = VectorDocument::new(width, height);
    for layer in &resolved {
        merged_vector.push_group(&layer.color.hex);
    }

    let mut layer_vectors = Vec::with_capacity(raster_result.layers.len());
    for layer in &raster_result.layers {
        layer_vectors.push(VectorDocument::layer(
            width,
            height,
            &layer.color.hex,
            &layer.dots,
        ));
        merged_vector.append_to_group(&layer.color.hex, &layer.dots);
    }

    Ok(ExportResult {
        raster: raster_result,
        layer_vectors,
        merged_vector,
    })
}

fn render_raster_pass(
    source: &SourceImage,
    request: &RenderRequest,
    resolved: &[ResolvedLayer],
    rng: &mut SmallRng,
) -> ScreentoneResult<RenderResult> {
    let (width, height) = (source.width(), source.height());

    let mut layers = Vec::with_capacity(resolved.len());
    for layer in resolved {
        let dots = engine::separate(source, layer, rng);
        tracing::debug!(color = %layer.color.hex, dots = dots.len(), "separated layer");
        let raster = raster::rasterize_dots(width, height, layer.target_rgb, &dots)?;
        layers.push(LayerRender {
            color: layer.color.clone(),
            dots,
            raster,
        });
    }

    let paint_order = request.paint_order();
    let ordered: Vec<&RasterRGBA> = paint_order.iter().map(|&i| &layers[i].raster).collect();
    let merged = raster::merge_back_to_front(width, height, &ordered)?;

    Ok(RenderResult {
        width,
        height,
        layers,
        merged,
    })
}

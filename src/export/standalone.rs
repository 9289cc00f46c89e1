use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::{
    assets::decode::{SourceImage, decode_source},
    foundation::{
        core::Canvas,
        error::{MosaicError, MosaicResult},
    },
    settings::Settings,
};

/// `id` of the inline JSON block carrying image, settings and canvas.
pub const DATA_ELEMENT_ID: &str = "mosaic-data";

const PLAYER_JS: &str = include_str!("player.js");

/// Structured literal embedded in a standalone document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandalonePayload {
    pub settings: Settings,
    pub canvas: Canvas,
    /// `data:` URI of the original encoded image.
    pub image: String,
}

pub fn image_data_uri(source: &SourceImage) -> String {
    format!(
        "data:{};base64,{}",
        source.mime_type(),
        base64::engine::general_purpose::STANDARD.encode(source.encoded.as_slice())
    )
}

/// Self-contained HTML page that replays the mosaic without any network access.
#[tracing::instrument(skip_all, fields(bytes = source.encoded.len()))]
pub fn generate_standalone_html(
    source: &SourceImage,
    settings: &Settings,
    canvas: Canvas,
) -> MosaicResult<String> {
    let payload = StandalonePayload {
        settings: settings.clone(),
        canvas,
        image: image_data_uri(source),
    };
    // No raw `<` may reach the script body: `</script>` and `<!--` both change how it parses.
    let json = serde_json::to_string(&payload)?.replace('<', "\\u003c");
    let page_bg = settings.background_rgb().to_hex();

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>ASCII Mosaic</title>
<style>
body {{ margin: 0; background: {page_bg}; overflow: hidden; display: flex; justify-content: center; align-items: center; height: 100vh; }}
canvas {{ max-width: 100%; max-height: 100vh; box-shadow: 0 4px 20px rgba(0,0,0,0.3); }}
</style>
</head>
<body>
<canvas id="canvas" width="{w}" height="{h}"></canvas>
<script id="{DATA_ELEMENT_ID}" type="application/json">{json}</script>
<script>
{PLAYER_JS}
</script>
</body>
</html>
"#,
        w = canvas.width,
        h = canvas.height,
    ))
}

/// A standalone document read back into engine inputs.
#[derive(Clone, Debug)]
pub struct StandaloneDocument {
    pub settings: Settings,
    pub canvas: Canvas,
    pub source: SourceImage,
}

impl StandaloneDocument {
    pub fn parse(html: &str) -> MosaicResult<Self> {
        let open = format!(r#"<script id="{DATA_ELEMENT_ID}" type="application/json">"#);
        let start = html
            .find(&open)
            .map(|i| i + open.len())
            .ok_or_else(|| MosaicError::export("document has no mosaic data block"))?;
        let len = html[start..]
            .find("</script>")
            .ok_or_else(|| MosaicError::export("unterminated mosaic data block"))?;

        let payload: StandalonePayload = serde_json::from_str(&html[start..start + len])?;
        payload.settings.validate()?;
        let canvas = Canvas::new(payload.canvas.width, payload.canvas.height)?;
        let bytes = decode_data_uri(&payload.image)?;
        let source = decode_source(&bytes)?
            .ok_or_else(|| MosaicError::export("embedded data is not an image"))?;

        Ok(Self {
            settings: payload.settings,
            canvas,
            source,
        })
    }
}

fn decode_data_uri(uri: &str) -> MosaicResult<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| MosaicError::export("embedded image is not a data: URI"))?;
    let (meta, data) = rest
        .split_once(',')
        .ok_or_else(|| MosaicError::export("malformed data: URI"))?;
    if !meta.ends_with(";base64") {
        return Err(MosaicError::export("embedded image is not base64"));
    }
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| MosaicError::export(format!("embedded image base64: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/export/standalone.rs"]
mod tests;

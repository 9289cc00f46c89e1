use super::*;

fn source() -> SourceImage {
    SourceImage::from_rgba_image(image::RgbaImage::from_pixel(
        3,
        2,
        image::Rgba([90, 30, 200, 255]),
    ))
    .unwrap()
}

#[test]
fn data_uri_carries_mime_and_bytes() {
    let src = source();
    let uri = image_data_uri(&src);
    assert!(uri.starts_with("data:image/png;base64,"));
    assert_eq!(decode_data_uri(&uri).unwrap(), src.encoded.as_slice());
}

#[test]
fn document_is_self_contained() {
    let settings = Settings {
        background_color: "#203040".to_string(),
        ..Settings::default()
    };
    let html = generate_standalone_html(&source(), &settings, Canvas::new(640, 480).unwrap())
        .unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains(r#"<canvas id="canvas" width="640" height="480">"#));
    assert!(html.contains("background: #203040"));
    assert!(html.contains("requestAnimationFrame"));
    assert!(!html.contains("http:") && !html.contains("https:"));
}

#[test]
fn script_terminators_in_settings_are_escaped() {
    let settings = Settings {
        characters: "</script>AB".to_string(),
        ..Settings::default()
    };
    let html =
        generate_standalone_html(&source(), &settings, Canvas::new(8, 8).unwrap()).unwrap();
    assert_eq!(html.matches("</script>").count(), 2);

    let doc = StandaloneDocument::parse(&html).unwrap();
    assert_eq!(doc.settings.characters, "</script>AB");
}

#[test]
fn comment_openers_in_settings_are_escaped() {
    let settings = Settings {
        characters: "<!--<script>".to_string(),
        ..Settings::default()
    };
    let html =
        generate_standalone_html(&source(), &settings, Canvas::new(8, 8).unwrap()).unwrap();
    assert!(!html.contains("<!--"));
    assert!(html.contains("\\u003c!--\\u003cscript>"));

    let doc = StandaloneDocument::parse(&html).unwrap();
    assert_eq!(doc.settings.characters, "<!--<script>");
}

#[test]
fn parse_reads_back_everything() {
    let settings = Settings {
        grid_size: 8,
        invert: true,
        text_color: "#00ff00".to_string(),
        ..Settings::default()
    };
    let canvas = Canvas::new(120, 90).unwrap();
    let src = source();
    let html = generate_standalone_html(&src, &settings, canvas).unwrap();

    let doc = StandaloneDocument::parse(&html).unwrap();
    assert_eq!(doc.settings, settings);
    assert_eq!(doc.canvas, canvas);
    assert_eq!((doc.source.width, doc.source.height), (3, 2));
    assert_eq!(doc.source.encoded.as_slice(), src.encoded.as_slice());
}

#[test]
fn parse_rejects_foreign_documents() {
    assert!(StandaloneDocument::parse("<html><body>hi</body></html>").is_err());
    let bad = format!(
        r#"<script id="{DATA_ELEMENT_ID}" type="application/json">{{"settings":{{}},"canvas":{{"width":4,"height":4}},"image":"data:text/plain;base64,aGk="}}</script>"#
    );
    assert!(StandaloneDocument::parse(&bad).is_err());
}

//! Slide markup ingestion.
//!
//! Slides arrive as markup fragments in which each interactive-candidate
//! shape is a `<g>` group carrying a `shape` class marker, positional
//! `data-*` attributes and optionally embedded `<image>` references:
//!
//! ```xml
//! <g class="shape draggable" data-sid="sid7" data-x="100" data-y="50"
//!    data-w="40" data-h="40" data-rot="15">
//!   <image href="assets/img_a77009837b387304.png" width="40" height="40"/>
//! </g>
//! ```
//!
//! The `draggable` class is only a structural *candidate* marker; actual
//! drag eligibility is decided later by the classifier.

use crate::shape::Shape;
use kurbo::Point;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Errors raised while ingesting slide markup. Markup is a startup input
/// supplied by an external collaborator, so unlike runtime anomalies it is
/// allowed to fail loudly.
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("no slide fragments supplied")]
    NoSlides,
    #[error("malformed markup: {0}")]
    Xml(String),
    #[error("shape group is missing its `data-sid` attribute")]
    MissingShapeId,
    #[error("shape `{sid}` is missing attribute `{attr}`")]
    MissingAttribute { sid: String, attr: &'static str },
    #[error("shape `{sid}`: attribute `{attr}` has non-numeric value `{value}`")]
    InvalidNumber {
        sid: String,
        attr: &'static str,
        value: String,
    },
}

/// Parse one slide fragment into its shapes, in document order.
///
/// Groups without the `shape` class marker and all other markup are
/// skipped; they are static artwork the engine never touches.
pub fn parse_slide(fragment: &str) -> Result<Vec<Shape>, MarkupError> {
    let mut reader = Reader::from_str(fragment);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::with_capacity(256);
    let mut shapes = Vec::new();
    // The shape group currently being read, with the depth it opened at.
    let mut open: Option<(Shape, usize)> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                match e.local_name().as_ref() {
                    b"g" if open.is_none() => {
                        if let Some(shape) = shape_from_group(e)? {
                            open = Some((shape, depth));
                        }
                    }
                    b"image" => {
                        if let Some((shape, _)) = open.as_mut() {
                            if let Some(href) = image_href(e)? {
                                shape.image_refs.push(href);
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"image" => {
                    if let Some((shape, _)) = open.as_mut() {
                        if let Some(href) = image_href(e)? {
                            shape.image_refs.push(href);
                        }
                    }
                }
                b"g" if open.is_none() => {
                    if let Some(shape) = shape_from_group(e)? {
                        shapes.push(shape);
                    }
                }
                _ => {}
            },
            Ok(Event::End(_)) => {
                if let Some((shape, opened_at)) = open.take() {
                    if depth == opened_at {
                        shapes.push(shape);
                    } else {
                        open = Some((shape, opened_at));
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(MarkupError::Xml(format!(
                    "at position {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(shapes)
}

/// Build a shape from a `<g>` start tag, or `None` if the group does not
/// carry the `shape` class marker.
fn shape_from_group(element: &BytesStart) -> Result<Option<Shape>, MarkupError> {
    let mut class = None;
    let mut sid = None;
    let mut x = None;
    let mut y = None;
    let mut w = None;
    let mut h = None;
    let mut rot = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| MarkupError::Xml(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| MarkupError::Xml(e.to_string()))?
            .into_owned();
        match attr.key.as_ref() {
            b"class" => class = Some(value),
            b"data-sid" => sid = Some(value),
            b"data-x" => x = Some(value),
            b"data-y" => y = Some(value),
            b"data-w" => w = Some(value),
            b"data-h" => h = Some(value),
            b"data-rot" => rot = Some(value),
            _ => {}
        }
    }

    let class = class.unwrap_or_default();
    if !class.split_whitespace().any(|token| token == "shape") {
        return Ok(None);
    }

    let sid = sid.ok_or(MarkupError::MissingShapeId)?;
    let x = numeric(&sid, "data-x", x)?;
    let y = numeric(&sid, "data-y", y)?;
    let w = numeric(&sid, "data-w", w)?;
    let h = numeric(&sid, "data-h", h)?;
    let rotation = match rot {
        Some(value) => parse_number(&sid, "data-rot", value)?,
        None => 0.0,
    };

    let mut shape = Shape::new(sid, Point::new(x, y), w, h);
    shape.rotation = rotation;
    shape.candidate = class.split_whitespace().any(|token| token == "draggable");
    Ok(Some(shape))
}

/// Resource identifier of an `<image>` element, from `href` or the legacy
/// `xlink:href` form.
fn image_href(element: &BytesStart) -> Result<Option<String>, MarkupError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| MarkupError::Xml(e.to_string()))?;
        if matches!(attr.key.as_ref(), b"href" | b"xlink:href") {
            let value = attr
                .unescape_value()
                .map_err(|e| MarkupError::Xml(e.to_string()))?;
            if !value.is_empty() {
                return Ok(Some(value.into_owned()));
            }
        }
    }
    Ok(None)
}

fn numeric(sid: &str, attr: &'static str, value: Option<String>) -> Result<f64, MarkupError> {
    let value = value.ok_or_else(|| MarkupError::MissingAttribute {
        sid: sid.to_string(),
        attr,
    })?;
    parse_number(sid, attr, value)
}

fn parse_number(sid: &str, attr: &'static str, value: String) -> Result<f64, MarkupError> {
    value.trim().parse().map_err(|_| MarkupError::InvalidNumber {
        sid: sid.to_string(),
        attr,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENT: &str = r##"
        <svg viewBox="0 0 800 600">
          <rect width="800" height="600" fill="#fff"/>
          <g class="shape draggable" data-sid="sid7" data-x="100" data-y="50"
             data-w="40" data-h="40">
            <image href="assets/tomato.png" width="40" height="40"/>
          </g>
          <g class="shape" data-sid="sid8" data-x="10" data-y="20"
             data-w="80" data-h="30" data-rot="15">
            <image xlink:href="assets/background.jpg"/>
            <text>label</text>
          </g>
          <g class="decoration">
            <image href="assets/frame.png"/>
          </g>
        </svg>
    "##;

    #[test]
    fn test_parses_shapes_in_document_order() {
        let shapes = parse_slide(FRAGMENT).unwrap();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].id, "sid7");
        assert_eq!(shapes[1].id, "sid8");
    }

    #[test]
    fn test_shape_attributes() {
        let shapes = parse_slide(FRAGMENT).unwrap();

        let first = &shapes[0];
        assert_eq!(first.base, Point::new(100.0, 50.0));
        assert_eq!((first.width, first.height), (40.0, 40.0));
        assert_eq!(first.rotation, 0.0);
        assert!(first.candidate);
        assert!(!first.draggable);
        assert_eq!(first.image_refs, ["assets/tomato.png"]);

        let second = &shapes[1];
        assert_eq!(second.rotation, 15.0);
        assert!(!second.candidate);
        assert_eq!(second.image_refs, ["assets/background.jpg"]);
    }

    #[test]
    fn test_non_shape_groups_are_skipped() {
        let shapes = parse_slide(FRAGMENT).unwrap();
        assert!(shapes.iter().all(|s| s.id != "decoration"));
    }

    #[test]
    fn test_self_closing_shape_group() {
        let shapes = parse_slide(
            r#"<g class="shape" data-sid="s" data-x="1" data-y="2" data-w="3" data-h="4"/>"#,
        )
        .unwrap();
        assert_eq!(shapes.len(), 1);
        assert!(shapes[0].image_refs.is_empty());
    }

    #[test]
    fn test_missing_sid_is_an_error() {
        let result =
            parse_slide(r#"<g class="shape" data-x="1" data-y="2" data-w="3" data-h="4"></g>"#);
        assert!(matches!(result, Err(MarkupError::MissingShapeId)));
    }

    #[test]
    fn test_missing_position_is_an_error() {
        let result = parse_slide(r#"<g class="shape" data-sid="s" data-x="1"></g>"#);
        assert!(matches!(
            result,
            Err(MarkupError::MissingAttribute { attr: "data-y", .. })
        ));
    }

    #[test]
    fn test_non_numeric_attribute_is_an_error() {
        let result = parse_slide(
            r#"<g class="shape" data-sid="s" data-x="wide" data-y="2" data-w="3" data-h="4"></g>"#,
        );
        assert!(matches!(
            result,
            Err(MarkupError::InvalidNumber { attr: "data-x", .. })
        ));
    }

    #[test]
    fn test_unclosed_markup_is_an_error() {
        let result = parse_slide("<g class=");
        assert!(matches!(result, Err(MarkupError::Xml(_))));
    }

    #[test]
    fn test_nested_group_content_stays_in_shape() {
        let shapes = parse_slide(
            r#"<g class="shape" data-sid="s" data-x="0" data-y="0" data-w="10" data-h="10">
                 <g><image href="assets/inner.png"/></g>
               </g>"#,
        )
        .unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].image_refs, ["assets/inner.png"]);
    }
}

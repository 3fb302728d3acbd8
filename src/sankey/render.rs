use palette::Srgb;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::builder::SankeyDiagram;
use super::SankeyError;

/// Plotly bundle referenced by the emitted fragment.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

// ---------------------------------------------------------------------------
// Rendering parameters
// ---------------------------------------------------------------------------

/// Display-only knobs. They take part in the memoisation key, so they are
/// `Eq + Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    /// Vertical gap between nodes, in pixels.
    pub pad: u32,
    /// Node bar width, in pixels.
    pub thickness: u32,
    pub width: u32,
    pub height: u32,
    /// Where the host page loads the charting runtime from.
    pub runtime_url: String,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            pad: 20,
            thickness: 20,
            width: 1200,
            height: 900,
            runtime_url: PLOTLY_CDN.to_string(),
        }
    }
}

impl RenderParams {
    fn validate(&self) -> Result<(), SankeyError> {
        if self.width == 0 || self.height == 0 {
            return Err(SankeyError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.runtime_url.trim().is_empty() {
            return Err(SankeyError::RuntimeUnavailable(
                "no charting runtime URL configured".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Plotly trace (serialised as JSON)
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Trace<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    node: TraceNodes<'a>,
    link: TraceLinks,
    textfont: TextFont,
}

#[derive(Serialize)]
struct TraceNodes<'a> {
    label: Vec<&'a str>,
    pad: u32,
    thickness: u32,
    color: Vec<String>,
}

#[derive(Serialize)]
struct TraceLinks {
    source: Vec<usize>,
    target: Vec<usize>,
    value: Vec<u32>,
}

#[derive(Serialize)]
struct TextFont {
    size: u32,
    color: &'static str,
}

#[derive(Serialize)]
struct Layout {
    width: u32,
    height: u32,
}

/// CSS `rgb(r,g,b)` form of a node colour.
pub fn css_rgb(color: Srgb<u8>) -> String {
    format!("rgb({},{},{})", color.red, color.green, color.blue)
}

fn to_script_json<T: Serialize>(value: &T) -> Result<String, SankeyError> {
    // A label containing "</script>" must not close the inline script.
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Serialise a diagram into a self-contained HTML fragment.
///
/// The fragment holds a sized `<div>`, the Plotly runtime `<script>` and an
/// inline script drawing the diagram. Identical input yields identical output.
pub fn render_html(diagram: &SankeyDiagram, params: &RenderParams) -> Result<String, SankeyError> {
    params.validate()?;

    let trace = Trace {
        kind: "sankey",
        node: TraceNodes {
            label: diagram.nodes.iter().map(|n| n.label.as_str()).collect(),
            pad: params.pad,
            thickness: params.thickness,
            color: diagram.nodes.iter().map(|n| css_rgb(n.color)).collect(),
        },
        link: TraceLinks {
            source: diagram.links.iter().map(|l| l.source).collect(),
            target: diagram.links.iter().map(|l| l.target).collect(),
            value: diagram.links.iter().map(|l| l.value).collect(),
        },
        textfont: TextFont {
            size: 25,
            color: "#2A4B9B",
        },
    };
    let data = to_script_json(&[trace])?;
    let layout = to_script_json(&Layout {
        width: params.width,
        height: params.height,
    })?;

    let id = element_id(&data, &layout, params);

    Ok(format!(
        r#"<div id="{id}" class="sankey-diagram" style="width:{w}px;height:{h}px;"></div>
<script src="{runtime}" charset="utf-8"></script>
<script type="text/javascript">
  Plotly.newPlot("{id}", {data}, {layout}, {{"responsive": false}});
</script>
"#,
        w = params.width,
        h = params.height,
        runtime = params.runtime_url,
    ))
}

/// Element id derived from a SHA-256 digest of the serialised trace and
/// layout, so it is stable across builds and toolchains.
fn element_id(data: &str, layout: &str, params: &RenderParams) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hasher.update(layout.as_bytes());
    hasher.update(params.pad.to_le_bytes());
    hasher.update(params.thickness.to_le_bytes());
    hasher.update(params.runtime_url.as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest[..8].iter().map(|b| format!("{b:02x}")).collect();
    format!("sankey-{hex}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sankey::builder::{NodeTier, SankeyLink, SankeyNode};
    use crate::sankey::family::MethodFamily;

    fn diagram() -> SankeyDiagram {
        SankeyDiagram {
            nodes: vec![
                SankeyNode {
                    label: "DNA".to_string(),
                    tier: NodeTier::DataType,
                    dominant: Some(MethodFamily::ModelBased),
                    color: MethodFamily::ModelBased.color(),
                },
                SankeyNode {
                    label: "Model-based".to_string(),
                    tier: NodeTier::Family,
                    dominant: Some(MethodFamily::ModelBased),
                    color: MethodFamily::ModelBased.color(),
                },
            ],
            links: vec![SankeyLink {
                source: 0,
                target: 1,
                value: 4,
            }],
            diagnostics: Default::default(),
        }
    }

    #[test]
    fn fragment_embeds_trace_runtime_and_size() {
        let html = render_html(&diagram(), &RenderParams::default()).unwrap();

        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains("width:1200px;height:900px"));
        assert!(html.contains(r#""type":"sankey""#));
        assert!(html.contains(r#""label":["DNA","Model-based"]"#));
        assert!(html.contains(r#""color":["rgb(80,185,112)","rgb(80,185,112)"]"#));
        assert!(html.contains(r#""source":[0],"target":[1],"value":[4]"#));
        assert!(html.contains(r#""pad":20,"thickness":20"#));
    }

    #[test]
    fn rendering_is_deterministic() {
        let params = RenderParams::default();
        assert_eq!(
            render_html(&diagram(), &params).unwrap(),
            render_html(&diagram(), &params).unwrap()
        );
    }

    #[test]
    fn element_id_is_a_fixed_width_digest() {
        let params = RenderParams::default();
        let id = element_id("[]", "{}", &params);
        assert_eq!(id, element_id("[]", "{}", &params));
        let hex = id.strip_prefix("sankey-").unwrap();
        assert_eq!(hex.len(), 16);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));

        let padded = RenderParams {
            pad: 30,
            ..RenderParams::default()
        };
        assert_ne!(id, element_id("[]", "{}", &padded));
        assert_ne!(id, element_id("[1]", "{}", &params));
    }

    #[test]
    fn zero_size_is_rejected() {
        let params = RenderParams {
            width: 0,
            ..RenderParams::default()
        };
        let err = render_html(&diagram(), &params).unwrap_err();
        assert!(matches!(err, SankeyError::InvalidDimensions { width: 0, height: 900 }));
    }

    #[test]
    fn missing_runtime_is_a_distinct_failure() {
        let params = RenderParams {
            runtime_url: String::new(),
            ..RenderParams::default()
        };
        let err = render_html(&diagram(), &params).unwrap_err();
        assert!(matches!(err, SankeyError::RuntimeUnavailable(_)));
    }

    #[test]
    fn labels_cannot_close_the_script() {
        let mut d = diagram();
        d.nodes[0].label = "</script><b>".to_string();
        let html = render_html(&d, &RenderParams::default()).unwrap();
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn empty_diagram_still_renders() {
        let html = render_html(&SankeyDiagram::default(), &RenderParams::default()).unwrap();
        assert!(html.contains(r#""label":[]"#));
        assert!(html.contains(r#""source":[],"target":[],"value":[]"#));
    }
}

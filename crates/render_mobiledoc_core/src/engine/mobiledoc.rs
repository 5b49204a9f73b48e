//! Reference DOM engine for mobiledoc 0.3 documents.
//!
//! Walks sections and markers only as far as needed to produce nodes; it does
//! not validate document structure beyond that.

use crate::dom::{Element, Fragment, Node};
use crate::engine::definition::{EntityRenderArgs, RenderEnv, RenderType};
use crate::engine::options::RendererConfig;
use crate::engine::teardown::TeardownRegistrar;
use crate::engine::{RenderEngine, RenderError, RenderOutput, RenderResult};
use crate::model::entity::EntityKind;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::rc::Rc;

/// Mobiledoc versions this engine walks.
pub const SUPPORTED_VERSIONS: &[&str] = &["0.3.0", "0.3.1", "0.3.2"];

const MARKUP_SECTION_TYPE: u64 = 1;
const IMAGE_SECTION_TYPE: u64 = 2;
const LIST_SECTION_TYPE: u64 = 3;
const CARD_SECTION_TYPE: u64 = 10;

const TEXT_MARKER_TYPE: u64 = 0;
const ATOM_MARKER_TYPE: u64 = 1;

const MARKUP_SECTION_TAGS: &[&str] = &[
    "aside",
    "blockquote",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "p",
];
const PULL_QUOTE_TAG: &str = "pull-quote";
const LIST_SECTION_TAGS: &[&str] = &["ol", "ul"];

#[derive(Debug, Deserialize)]
struct MobiledocDocument {
    #[serde(default)]
    atoms: Vec<(String, String, Value)>,
    #[serde(default)]
    cards: Vec<(String, Value)>,
    #[serde(default)]
    markups: Vec<Vec<Value>>,
    #[serde(default)]
    sections: Vec<Vec<Value>>,
}

/// Engine that renders mobiledoc 0.3 into `SimpleDocument`-style nodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct MobiledocDomRenderer;

impl MobiledocDomRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl RenderEngine for MobiledocDomRenderer {
    fn render(&self, config: &RendererConfig, mobiledoc: &Value) -> RenderResult<RenderOutput> {
        let document = parse_document(mobiledoc)?;
        let registrar = TeardownRegistrar::new();
        let root = Fragment::new();

        let pass = RenderPass {
            config,
            document: &document,
            registrar: &registrar,
        };
        let walked = document.sections.iter().try_for_each(|section| -> RenderResult<()> {
            if let Some(node) = pass.render_section(section)? {
                root.append_child(node);
            }
            Ok(())
        });
        if let Err(err) = walked {
            // Entities mounted before the failure must not outlive the pass.
            let reverted = registrar.into_teardown(root).run();
            warn!(
                "event=render_pass module=engine status=error reverted_callbacks={} error={}",
                reverted, err
            );
            return Err(err);
        }

        info!(
            "event=render_pass module=engine status=ok sections={} teardown_callbacks={}",
            document.sections.len(),
            registrar.len()
        );
        Ok(RenderOutput {
            result: root.clone(),
            teardown: registrar.into_teardown(root),
        })
    }
}

fn parse_document(mobiledoc: &Value) -> RenderResult<MobiledocDocument> {
    let version = mobiledoc
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing `version` string"))?;
    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(RenderError::UnsupportedVersion(version.to_string()));
    }
    MobiledocDocument::deserialize(mobiledoc).map_err(|err| malformed(err.to_string()))
}

struct RenderPass<'a> {
    config: &'a RendererConfig,
    document: &'a MobiledocDocument,
    registrar: &'a TeardownRegistrar,
}

impl RenderPass<'_> {
    fn render_section(&self, section: &[Value]) -> RenderResult<Option<Node>> {
        let section_type = u64_at(section, 0, "section type")?;
        match section_type {
            MARKUP_SECTION_TYPE => {
                let element = self.create_markup_section(str_at(section, 1, "section tag")?)?;
                self.render_markers(&element, array_at(section, 2, "section markers")?)?;
                Ok(Some(element.into()))
            }
            IMAGE_SECTION_TYPE => {
                let element = self.config.dom.create_element("img")?;
                element.set_attribute("src", str_at(section, 1, "image src")?);
                Ok(Some(element.into()))
            }
            LIST_SECTION_TYPE => {
                let tag_name = str_at(section, 1, "list tag")?.to_ascii_lowercase();
                if !LIST_SECTION_TAGS.contains(&tag_name.as_str()) {
                    return Err(malformed(format!("unsupported list tag `{tag_name}`")));
                }
                let list = self.config.dom.create_element(&tag_name)?;
                for item in array_at(section, 2, "list items")? {
                    let markers = item
                        .as_array()
                        .ok_or_else(|| malformed("list item must be a marker array"))?;
                    let element = self.config.dom.create_element("li")?;
                    self.render_markers(&element, markers)?;
                    list.append_child(element);
                }
                Ok(Some(list.into()))
            }
            CARD_SECTION_TYPE => {
                let index = usize_at(section, 1, "card index")?;
                let (name, payload) = self
                    .document
                    .cards
                    .get(index)
                    .ok_or_else(|| malformed(format!("card index {index} out of range")))?;
                self.render_entity(EntityKind::Card, name, payload, None)
            }
            other => Err(malformed(format!("unknown section type {other}"))),
        }
    }

    fn create_markup_section(&self, tag_name: &str) -> RenderResult<Element> {
        let tag_name = tag_name.to_ascii_lowercase();
        if tag_name == PULL_QUOTE_TAG {
            let element = self.config.dom.create_element("div")?;
            element.set_attribute("class", PULL_QUOTE_TAG);
            return Ok(element);
        }
        if !MARKUP_SECTION_TAGS.contains(&tag_name.as_str()) {
            return Err(malformed(format!("unsupported section tag `{tag_name}`")));
        }
        Ok(self.config.dom.create_element(&tag_name)?)
    }

    fn render_markers(&self, parent: &Element, markers: &[Value]) -> RenderResult<()> {
        let mut open = vec![parent.clone()];
        for marker in markers {
            let marker = marker
                .as_array()
                .ok_or_else(|| malformed("marker must be an array"))?;
            let marker_type = u64_at(marker, 0, "marker type")?;
            for index in array_at(marker, 1, "opened markups")? {
                let index = index
                    .as_u64()
                    .and_then(|index| usize::try_from(index).ok())
                    .ok_or_else(|| malformed("markup index must be an integer"))?;
                let element = self.create_markup(index)?;
                current(&open, parent).append_child(element.clone());
                open.push(element);
            }
            let close_count = usize_at(marker, 2, "closed markup count")?;

            let target = current(&open, parent);
            match marker_type {
                TEXT_MARKER_TYPE => {
                    let text = str_at(marker, 3, "marker text")?;
                    target.append_child(self.config.dom.create_text_node(text)?);
                }
                ATOM_MARKER_TYPE => {
                    let index = usize_at(marker, 3, "atom index")?;
                    let (name, value, payload) = self
                        .document
                        .atoms
                        .get(index)
                        .ok_or_else(|| malformed(format!("atom index {index} out of range")))?;
                    let rendered =
                        self.render_entity(EntityKind::Atom, name, payload, Some(value.as_str()))?;
                    if let Some(node) = rendered {
                        target.append_child(node);
                    }
                }
                other => return Err(malformed(format!("unknown marker type {other}"))),
            }

            for _ in 0..close_count {
                if open.len() > 1 {
                    open.pop();
                }
            }
        }
        Ok(())
    }

    fn create_markup(&self, index: usize) -> RenderResult<Element> {
        let markup = self
            .document
            .markups
            .get(index)
            .ok_or_else(|| malformed(format!("markup index {index} out of range")))?;
        let element = self
            .config
            .dom
            .create_element(str_at(markup, 0, "markup tag")?)?;
        if let Some(attributes) = markup.get(1).and_then(Value::as_array) {
            for pair in attributes.chunks(2) {
                if let [name, value] = pair {
                    if let (Some(name), Some(value)) = (name.as_str(), value.as_str()) {
                        if !element.set_attribute(name, value) {
                            warn!(
                                "event=markup_attribute_skipped module=engine status=invalid markup={}",
                                index
                            );
                        }
                    }
                }
            }
        }
        Ok(element)
    }

    fn render_entity(
        &self,
        kind: EntityKind,
        name: &str,
        payload: &Value,
        value: Option<&str>,
    ) -> RenderResult<Option<Node>> {
        let env = RenderEnv::new(name, Rc::clone(&self.config.dom), self.registrar.clone());
        let args = EntityRenderArgs {
            env: &env,
            options: &self.config.card_options,
            payload,
            value,
        };

        if let Some(definition) = self.config.find_definition(kind, name) {
            if definition.render_type() != RenderType::Dom {
                return Err(RenderError::IncompatibleRenderType {
                    kind,
                    name: name.to_string(),
                    render_type: definition.render_type().as_str().to_string(),
                });
            }
            debug!("event=entity_render module=engine status=ok kind={kind} name={name}");
            return definition.render(&args);
        }

        match self.config.unknown_handler(kind) {
            Some(handler) => {
                debug!("event=entity_render module=engine status=unknown kind={kind} name={name}");
                handler(&args)
            }
            None => Err(match kind {
                EntityKind::Card => RenderError::UnknownCard(name.to_string()),
                EntityKind::Atom => RenderError::UnknownAtom(name.to_string()),
            }),
        }
    }
}

fn current<'e>(open: &'e [Element], fallback: &'e Element) -> &'e Element {
    open.last().unwrap_or(fallback)
}

fn malformed(message: impl Into<String>) -> RenderError {
    RenderError::MalformedDocument(message.into())
}

fn u64_at(values: &[Value], index: usize, what: &str) -> RenderResult<u64> {
    values
        .get(index)
        .and_then(Value::as_u64)
        .ok_or_else(|| malformed(format!("{what} must be an integer")))
}

fn usize_at(values: &[Value], index: usize, what: &str) -> RenderResult<usize> {
    let value = u64_at(values, index, what)?;
    usize::try_from(value).map_err(|_| malformed(format!("{what} {value} is out of range")))
}

fn str_at<'v>(values: &'v [Value], index: usize, what: &str) -> RenderResult<&'v str> {
    values
        .get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(format!("{what} must be a string")))
}

fn array_at<'v>(values: &'v [Value], index: usize, what: &str) -> RenderResult<&'v [Value]> {
    values
        .get(index)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| malformed(format!("{what} must be an array")))
}

#[cfg(test)]
mod tests {
    use super::MobiledocDomRenderer;
    use crate::dom::{Node, SimpleDocument};
    use crate::engine::definition::{unknown_entity_handler, EntityDefinition, RenderType};
    use crate::engine::options::RendererConfig;
    use crate::engine::{RenderEngine, RenderError};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn config() -> RendererConfig {
        RendererConfig::new(Rc::new(SimpleDocument::new()))
    }

    #[test]
    fn renders_markup_sections_with_nested_markups() {
        let doc = json!({
            "version": "0.3.2",
            "markups": [["b"], ["a", ["href", "https://example.com"]]],
            "sections": [
                [1, "P", [
                    [0, [], 0, "plain "],
                    [0, [0, 1], 1, "bold link"],
                    [0, [], 1, " bold"],
                    [0, [], 0, " tail"]
                ]],
                [1, "pull-quote", [[0, [], 0, "q"]]]
            ]
        });

        let output = MobiledocDomRenderer::new()
            .render(&config(), &doc)
            .expect("render");

        assert_eq!(
            output.result.to_html(),
            "<p>plain <b><a href=\"https://example.com\">bold link</a> bold</b> tail</p>\
             <div class=\"pull-quote\">q</div>"
        );
    }

    #[test]
    fn renders_list_and_image_sections() {
        let doc = json!({
            "version": "0.3.0",
            "sections": [
                [3, "ul", [[[0, [], 0, "one"]], [[0, [], 0, "two"]]]],
                [2, "/cat.png"]
            ]
        });

        let output = MobiledocDomRenderer::new()
            .render(&config(), &doc)
            .expect("render");
        assert_eq!(
            output.result.to_html(),
            "<ul><li>one</li><li>two</li></ul><img src=\"/cat.png\">"
        );
    }

    #[test]
    fn explicit_card_definitions_render_and_register_teardown() {
        let torn_down = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&torn_down);
        let mut config = config();
        config.cards.push(EntityDefinition::dom("hr-card", move |args| {
            let name = args.env.name().to_string();
            let sink = Rc::clone(&sink);
            args.env.on_teardown(move || sink.borrow_mut().push(name));
            Ok(Some(Node::Element(args.env.dom().create_element("hr")?)))
        }));
        let doc = json!({
            "version": "0.3.1",
            "cards": [["hr-card", {}]],
            "sections": [[10, 0], [10, 0]]
        });

        let output = MobiledocDomRenderer::new()
            .render(&config, &doc)
            .expect("render");
        assert_eq!(output.result.to_html(), "<hr><hr>");
        assert_eq!(output.teardown.pending_callbacks(), 2);

        let fragment = output.result.clone();
        assert_eq!(output.teardown.run(), 2);
        assert_eq!(torn_down.borrow().len(), 2);
        assert!(fragment.is_empty());
    }

    #[test]
    fn atoms_receive_value_and_payload() {
        let mut config = config();
        config.atoms.push(EntityDefinition::dom("mention", |args| {
            let element = args.env.dom().create_element("em")?;
            element.append_child(Node::Text(format!(
                "{}#{}",
                args.value.unwrap_or_default(),
                args.payload["id"]
            )));
            Ok(Some(element.into()))
        }));
        let doc = json!({
            "version": "0.3.2",
            "atoms": [["mention", "@ann", {"id": 4}]],
            "sections": [[1, "p", [[0, [], 0, "hi "], [1, [], 0, 0]]]]
        });

        let output = MobiledocDomRenderer::new()
            .render(&config, &doc)
            .expect("render");
        assert_eq!(output.result.to_html(), "<p>hi <em>@ann#4</em></p>");
    }

    #[test]
    fn unknown_entities_use_handler_or_fail() {
        let doc = json!({
            "version": "0.3.2",
            "cards": [["missing", {}]],
            "sections": [[10, 0]]
        });

        let err = MobiledocDomRenderer::new()
            .render(&config(), &doc)
            .err()
            .expect("unknown card without handler must fail");
        assert_eq!(err, RenderError::UnknownCard("missing".to_string()));

        let mut config = config();
        config.unknown_card_handler = Some(unknown_entity_handler(|_| Ok(None)));
        let output = MobiledocDomRenderer::new()
            .render(&config, &doc)
            .expect("handler should render");
        assert!(output.result.is_empty());
    }

    #[test]
    fn rejects_non_dom_definitions() {
        let mut config = config();
        config
            .cards
            .push(EntityDefinition::new("txt", RenderType::Text, |_| Ok(None)));
        let doc = json!({"version": "0.3.2", "cards": [["txt", {}]], "sections": [[10, 0]]});

        let err = MobiledocDomRenderer::new()
            .render(&config, &doc)
            .err()
            .expect("text definition must be rejected");
        assert!(matches!(err, RenderError::IncompatibleRenderType { .. }));
    }

    #[test]
    fn rejects_unsupported_or_malformed_documents() {
        let engine = MobiledocDomRenderer::new();
        let err = engine
            .render(&config(), &json!({"version": "0.2.0", "sections": []}))
            .err()
            .expect("old version");
        assert_eq!(err, RenderError::UnsupportedVersion("0.2.0".to_string()));

        let err = engine
            .render(&config(), &json!({"sections": []}))
            .err()
            .expect("missing version");
        assert!(matches!(err, RenderError::MalformedDocument(_)));

        let err = engine
            .render(&config(), &json!({"version": "0.3.2", "sections": [[10, 3]]}))
            .err()
            .expect("dangling card index");
        assert!(matches!(err, RenderError::MalformedDocument(_)));
    }

    #[test]
    fn failed_pass_runs_teardowns_collected_before_the_failure() {
        let torn_down = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&torn_down);
        let mut config = config();
        config.cards.push(EntityDefinition::dom("ok", move |args| {
            let sink = Rc::clone(&sink);
            args.env.on_teardown(move || sink.borrow_mut().push("ok"));
            Ok(None)
        }));
        let doc = json!({
            "version": "0.3.2",
            "cards": [["ok", {}], ["nope", {}]],
            "sections": [[10, 0], [10, 1]]
        });

        let err = MobiledocDomRenderer::new()
            .render(&config, &doc)
            .err()
            .expect("unknown second card");

        assert_eq!(err, RenderError::UnknownCard("nope".to_string()));
        assert_eq!(*torn_down.borrow(), vec!["ok"]);
    }

    #[test]
    fn markup_attributes_with_invalid_names_are_dropped() {
        let doc = json!({
            "version": "0.3.2",
            "markups": [["a", ["href=\"x\" onclick=\"alert(1)\" data-z", "v", "href", "/ok"]]],
            "sections": [[1, "p", [[0, [0], 1, "t"]]]]
        });

        let output = MobiledocDomRenderer::new()
            .render(&config(), &doc)
            .expect("render");
        assert_eq!(output.result.to_html(), "<p><a href=\"/ok\">t</a></p>");
    }

    #[test]
    fn oversized_indexes_are_malformed() {
        let doc = json!({
            "version": "0.3.2",
            "sections": [[10, u64::MAX]]
        });

        let err = MobiledocDomRenderer::new()
            .render(&config(), &doc)
            .err()
            .expect("index out of range");
        assert!(matches!(err, RenderError::MalformedDocument(_)));
    }
}

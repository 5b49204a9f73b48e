//! HTML serialization for rendered trees.

use super::node::{Element, Node};

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img"];

pub(super) fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(element) => write_element(out, element),
        Node::Text(text) => escape_into(out, text, false),
    }
}

pub(super) fn write_element(out: &mut String, element: &Element) {
    let tag_name = element.tag_name();
    out.push('<');
    out.push_str(&tag_name);
    for (name, value) in element.attributes() {
        out.push(' ');
        out.push_str(&name);
        out.push_str("=\"");
        escape_into(out, &value, true);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&tag_name.as_str()) {
        return;
    }

    for child in element.children() {
        write_node(out, &child);
    }
    out.push_str("</");
    out.push_str(&tag_name);
    out.push('>');
}

fn escape_into(out: &mut String, value: &str, attribute: bool) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::{Element, Node};

    #[test]
    fn escapes_text_and_attributes() {
        let element = Element::detached("p");
        element.set_attribute("title", "a \"b\" & c");
        element.append_child(Node::Text("1 < 2".to_string()));

        assert_eq!(
            element.to_html(),
            "<p title=\"a &quot;b&quot; &amp; c\">1 &lt; 2</p>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let image = Element::detached("img");
        image.set_attribute("src", "/a.png");
        assert_eq!(image.to_html(), "<img src=\"/a.png\">");
    }
}

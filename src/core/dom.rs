//! Script-free reading of served markup, used by the static inspector.
//!
//! Tags are walked in document order with an open-element stack, so the
//! root container is judged together with its ancestors. Styles from
//! stylesheets are not computed; only what the markup itself says counts:
//! the `hidden` attribute, inline `display`/`visibility`, `<template>`
//! ancestry and the Tailwind `hidden`/`invisible` utilities.

use crate::domain::ports::PageSnapshot;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"<(/?)([a-zA-Z][a-zA-Z0-9-]*)((?:\s+[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*)\s*(/?)>"#,
        )
        .expect("static pattern compiles")
    })
}

fn attribute_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
            .expect("static pattern compiles")
    })
}

fn opaque_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<!--.*?-->|<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
            .expect("static pattern compiles")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: HashMap<String, String>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn classes(&self) -> Vec<&str> {
        self.attr("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Why this element alone would not be rendered, if the markup says so.
    pub fn hidden_reason(&self) -> Option<String> {
        if self.tag == "template" {
            return Some("<template> content is never rendered".to_string());
        }
        if self.attributes.contains_key("hidden") {
            return Some("hidden attribute".to_string());
        }
        if let Some(class) = self
            .classes()
            .into_iter()
            .find(|c| matches!(*c, "hidden" | "invisible"))
        {
            return Some(format!("'{}' utility class", class));
        }

        let style = self.attr("style").unwrap_or_default();
        for declaration in style.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim().to_ascii_lowercase();
            let value = value
                .trim()
                .trim_end_matches("!important")
                .trim()
                .to_ascii_lowercase();

            match (property.as_str(), value.as_str()) {
                ("display", "none") => return Some("inline style display:none".to_string()),
                ("visibility", "hidden" | "collapse") => {
                    return Some(format!("inline style visibility:{}", value))
                }
                _ => {}
            }
        }
        None
    }

    fn describe(&self) -> String {
        match self.attr("id") {
            Some(id) => format!("<{} id=\"{}\">", self.tag, id),
            None => format!("<{}>", self.tag),
        }
    }
}

/// Reads `html` and reports the state of `#root_id` and the body classes.
pub fn snapshot(html: &str, root_id: &str) -> PageSnapshot {
    let markup = opaque_re().replace_all(html, |caps: &regex::Captures| " ".repeat(caps[0].len()));
    let mut open: Vec<Element> = Vec::new();
    let mut snapshot = PageSnapshot::default();
    let mut body_seen = false;

    for caps in tag_re().captures_iter(&markup) {
        let tag = caps[2].to_ascii_lowercase();

        if !caps[1].is_empty() {
            if let Some(pos) = open.iter().rposition(|e| e.tag == tag) {
                open.truncate(pos);
            }
            continue;
        }

        let element = Element {
            attributes: parse_attributes(&caps[3]),
            tag,
        };

        if element.tag == "body" && !body_seen {
            body_seen = true;
            snapshot.body_classes = element.classes().into_iter().map(str::to_string).collect();
        }

        if !snapshot.root_found && element.attr("id") == Some(root_id) {
            snapshot.root_found = true;
            let end = caps.get(0).map(|m| m.end()).unwrap_or_default();
            let self_closing = !caps[4].is_empty();
            snapshot.hidden_reason = root_hidden_reason(&element, &open)
                .or_else(|| is_empty(&markup[end..], &element.tag, self_closing).then(|| {
                    "element is empty, nothing was mounted into it".to_string()
                }));
            snapshot.root_visible = snapshot.hidden_reason.is_none();
        }

        if !caps[4].is_empty() || VOID_ELEMENTS.contains(&element.tag.as_str()) {
            continue;
        }
        open.push(element);
    }

    snapshot
}

fn root_hidden_reason(root: &Element, ancestors: &[Element]) -> Option<String> {
    if let Some(reason) = root.hidden_reason() {
        return Some(reason);
    }
    ancestors.iter().rev().find_map(|ancestor| {
        ancestor
            .hidden_reason()
            .map(|reason| format!("ancestor {} is hidden ({})", ancestor.describe(), reason))
    })
}

fn is_empty(rest: &str, tag: &str, self_closing: bool) -> bool {
    if self_closing {
        return true;
    }
    let rest = rest.trim_start();
    rest.get(..2) == Some("</")
        && rest[2..]
            .get(..tag.len())
            .is_some_and(|t| t.eq_ignore_ascii_case(tag))
}

fn parse_attributes(raw: &str) -> HashMap<String, String> {
    attribute_re()
        .captures_iter(raw)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            (name, value)
        })
        .collect()
}

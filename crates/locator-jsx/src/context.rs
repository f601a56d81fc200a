//! Per-file traversal state of the JSX annotator.
//!
//! A fresh [`FileContext`] is built for every file; nothing is carried over between files.

use locator_core::models::{
    ComponentInfo, ExpressionInfo, FileMetadataTable, SpanLocation, StyledDefinition,
};
use locator_core::{
    encode, encode_id, AnnotateOptions, Insertion, LineIndex, ATTR_COLUMN, ATTR_FILE, ATTR_ID,
    ATTR_LINE, ATTR_LOCATOR, ATTR_STYLED,
};
use swc_common::{BytePos, Span, Spanned};
use swc_ecma_ast::{
    Expr, FnDecl, JSXAttrName, JSXAttrOrSpread, JSXElement, JSXElementName, JSXObject,
    JSXOpeningElement, MemberProp, Pat, TaggedTpl, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::disallow::is_disallowed_component;
use crate::transform::{AttributeMode, JsxOptions};

pub(crate) struct FileContext<'a> {
    source: &'a str,
    start_pos: BytePos,
    index: LineIndex,
    options: &'a AnnotateOptions,
    jsx: &'a JsxOptions,
    table: FileMetadataTable,
    insertions: Vec<Insertion>,
    /// Enclosing component IDs, innermost last
    component_stack: Vec<usize>,
    /// Variable a `styled.tag` template is directly assigned to
    styled_binding: Option<String>,
    /// Elements that passed the split-mode filters, annotated or not
    split_count: usize,
}

impl<'a> FileContext<'a> {
    pub(crate) fn new(
        source: &'a str,
        start_pos: BytePos,
        options: &'a AnnotateOptions,
        jsx: &'a JsxOptions,
        table: FileMetadataTable,
    ) -> Self {
        Self {
            source,
            start_pos,
            index: LineIndex::new(source),
            options,
            jsx,
            table,
            insertions: Vec::new(),
            component_stack: Vec::new(),
            styled_binding: None,
            split_count: 0,
        }
    }

    pub(crate) fn into_parts(self) -> (FileMetadataTable, Vec<Insertion>) {
        (self.table, self.insertions)
    }

    fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.start_pos.0) as usize
    }

    fn position(&self, pos: BytePos) -> (usize, usize) {
        self.index.location(self.source, self.offset(pos))
    }

    fn span_location(&self, span: Span) -> SpanLocation {
        SpanLocation::new(self.position(span.lo), self.position(span.hi))
    }

    fn register_component(&mut self, name: &str, span: Span) -> usize {
        let loc = self.span_location(span);
        self.table.add_component(ComponentInfo {
            name: name.to_string(),
            loc_string: format!("{}:{}", loc.start.line, loc.start.column),
            loc,
        })
    }

    fn with_component(&mut self, id: usize, visit: impl FnOnce(&mut Self)) {
        self.component_stack.push(id);
        visit(self);
        self.component_stack.pop();
    }

    /// Whether the element should get attributes in the current mode
    fn is_eligible(&mut self, name: &str, opening: &JSXOpeningElement) -> bool {
        if self.options.is_ignored(name) {
            return false;
        }
        if self.jsx.mode != AttributeMode::Split {
            return !is_disallowed_component(name)
                && !has_attribute(opening, &[ATTR_LOCATOR, ATTR_ID]);
        }

        let split = &self.jsx.split;
        if !split.admits(name) {
            return false;
        }
        if split
            .max_elements_per_file
            .is_some_and(|max| self.split_count >= max)
        {
            return false;
        }
        // already-annotated elements still count towards the limit
        self.split_count += 1;
        !has_attribute(opening, &[ATTR_FILE])
    }

    fn annotate_opening(&mut self, opening: &JSXOpeningElement) {
        let name = element_name(&opening.name);
        if !self.is_eligible(&name, opening) {
            return;
        }

        let loc = self.span_location(opening.span);
        let insert_after = opening
            .type_args
            .as_ref()
            .map(|args| args.span.hi)
            .unwrap_or_else(|| opening.name.span().hi);
        let at = self.offset(insert_after);

        let id = self.table.add_expression(ExpressionInfo {
            name,
            loc,
            wrapping_component_id: self.component_stack.last().copied(),
        });
        let full_path = self.table.full_path();
        let text = match self.jsx.mode {
            AttributeMode::Path => format!(
                " {}={{{}}}",
                ATTR_LOCATOR,
                json_string(&encode(&full_path, loc.start.line, loc.start.column))
            ),
            AttributeMode::Id => format!(
                " {}={{{}}}",
                ATTR_ID,
                json_string(&encode_id(&full_path, id))
            ),
            AttributeMode::Split => format!(
                " {}={{{}}} {}=\"{}\" {}=\"{}\"",
                ATTR_FILE,
                json_string(&full_path),
                ATTR_LINE,
                loc.start.line,
                ATTR_COLUMN,
                loc.start.column
            ),
        };

        self.insertions.push(Insertion::new(at, text));
    }
}

impl Visit for FileContext<'_> {
    fn visit_fn_decl(&mut self, node: &FnDecl) {
        let id = self.register_component(&node.ident.sym, node.function.span);
        self.with_component(id, |ctx| node.visit_children_with(ctx));
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        let name = match &node.name {
            Pat::Ident(binding) => Some(binding.id.sym.to_string()),
            _ => None,
        };
        let init = node.init.as_deref();

        let styled_binding = match init {
            Some(Expr::TaggedTpl(_)) => name.clone(),
            _ => None,
        };
        let previous = std::mem::replace(&mut self.styled_binding, styled_binding);

        match (name, init) {
            (Some(name), Some(Expr::Arrow(_) | Expr::Fn(_))) => {
                let id = self.register_component(&name, node.span);
                self.with_component(id, |ctx| node.visit_children_with(ctx));
            }
            _ => node.visit_children_with(self),
        }

        self.styled_binding = previous;
    }

    fn visit_tagged_tpl(&mut self, node: &TaggedTpl) {
        let binding = self.styled_binding.take();

        let instrument = self.jsx.mode != AttributeMode::Split;
        if let Some(html_tag) = styled_tag(&node.tag).filter(|_| instrument) {
            let id = self.table.add_styled(StyledDefinition {
                name: binding,
                loc: self.span_location(node.span),
                html_tag,
            });
            let value = encode_id(&self.table.full_path(), id);
            self.insertions.push(Insertion::new(
                self.offset(node.tag.span().hi),
                format!(
                    ".attrs(() => ({{{}: {}}}))",
                    json_string(ATTR_STYLED),
                    json_string(&value)
                ),
            ));
        }

        node.visit_children_with(self);
    }

    fn visit_jsx_element(&mut self, node: &JSXElement) {
        self.annotate_opening(&node.opening);
        node.visit_children_with(self);
    }
}

/// Dotted name of a JSX tag (`div`, `Foo.Bar`, `svg.rect` for `<svg:rect>`)
pub(crate) fn element_name(name: &JSXElementName) -> String {
    match name {
        JSXElementName::Ident(ident) => ident.sym.to_string(),
        JSXElementName::JSXMemberExpr(member) => {
            format!("{}.{}", object_name(&member.obj), member.prop.sym)
        }
        JSXElementName::JSXNamespacedName(ns) => format!("{}.{}", ns.ns.sym, ns.name.sym),
    }
}

fn object_name(obj: &JSXObject) -> String {
    match obj {
        JSXObject::Ident(ident) => ident.sym.to_string(),
        JSXObject::JSXMemberExpr(member) => {
            format!("{}.{}", object_name(&member.obj), member.prop.sym)
        }
    }
}

fn has_attribute(opening: &JSXOpeningElement, names: &[&str]) -> bool {
    opening.attrs.iter().any(|attr| match attr {
        JSXAttrOrSpread::JSXAttr(attr) => matches!(
            &attr.name,
            JSXAttrName::Ident(ident) if names.contains(&&*ident.sym)
        ),
        JSXAttrOrSpread::SpreadElement(_) => false,
    })
}

/// `styled.tag` member expression used as a template tag
fn styled_tag(tag: &Expr) -> Option<String> {
    let Expr::Member(member) = tag else {
        return None;
    };
    let Expr::Ident(object) = member.obj.as_ref() else {
        return None;
    };
    match &member.prop {
        MemberProp::Ident(prop) if &*object.sym == "styled" => Some(prop.sym.to_string()),
        _ => None,
    }
}

fn json_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

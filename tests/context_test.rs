use std::sync::Arc;

use jpql_render::prelude::*;
use jpql_render::serializer::function::CallSerializer;
use jpql_render::serializer::write_args;
use jpql_render::writer::JpqlWriter;
use pretty_assertions::assert_eq;

/// Renders `soundex(x)` nodes as a database function call.
struct SoundexSerializer;

impl Serializer for SoundexSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::from("soundex")
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Custom(node)) = part else {
            return Err(RenderError::mismatch(self.handled_kind(), part.kind()));
        };
        writer.write("FUNCTION");
        writer.write_parentheses(|w| {
            w.write("'SOUNDEX', ");
            write_args(w, context, &node.args)
        })
    }
}

fn soundex_query() -> Query {
    let a = EntityRef::new("Author", "a");
    SelectQuery::new("Author", vec![Expr::entity(&a)], a.clone())
        .filter(Expr::custom("soundex", vec![a.path("name")]).equal(Expr::lit("T522")))
        .into()
}

#[test]
fn test_custom_node_without_serializer() {
    let err = JpqlRenderer::default()
        .render(&soundex_query(), RenderMode::Inline)
        .unwrap_err();
    assert!(matches!(err, RenderError::UnsupportedNodeKind(ref kind) if *kind == NodeKind::from("soundex")));
    assert_eq!(
        err.to_string(),
        "Unsupported node kind: 'soundex' has no registered serializer"
    );
}

#[test]
fn test_user_serializer_for_custom_node() {
    let context = RenderContext::default().with_serializer(SoundexSerializer);
    let result = JpqlRenderer::new(context)
        .render(&soundex_query(), RenderMode::Placeholder)
        .unwrap();
    assert_eq!(
        result.query,
        "SELECT a FROM Author AS a WHERE FUNCTION('SOUNDEX', a.name) = :param1"
    );
    assert_eq!(result.params["param1"], Value::from("T522"));
}

#[test]
fn test_single_override_leaves_other_kinds_alone() {
    let b = EntityRef::new("Book", "b");
    let query: Query = SelectQuery::new(
        "Object[]",
        vec![Expr::lower(b.path("title")), Expr::upper(b.path("title"))],
        b,
    )
    .into();

    let base = RenderContext::default();
    let derived = base.with_override(NodeKind::LOWER, Arc::new(CallSerializer::new(NodeKind::LOWER, "LCASE")));

    let overridden = JpqlRenderer::new(derived.clone()).render(&query, RenderMode::Inline).unwrap();
    assert_eq!(overridden.query, "SELECT LCASE(b.title), UPPER(b.title) FROM Book AS b");

    let untouched = JpqlRenderer::new(base).render(&query, RenderMode::Inline).unwrap();
    assert_eq!(untouched.query, "SELECT LOWER(b.title), UPPER(b.title) FROM Book AS b");

    let twice = derived.with_override(NodeKind::LOWER, Arc::new(CallSerializer::new(NodeKind::LOWER, "LCASE")));
    assert_eq!(twice.kinds(), derived.kinds());
    assert_eq!(
        JpqlRenderer::new(twice).render(&query, RenderMode::Inline).unwrap(),
        overridden
    );
}

#[test]
fn test_config_driven_context() {
    let config = RenderConfig::from_toml(
        r#"
        mode = "inline"

        [functions]
        upper = "UCASE"
        "#,
    )
    .unwrap();
    let b = EntityRef::new("Book", "b");
    let query: Query = SelectQuery::new("String", vec![Expr::upper(b.path("title"))], b).into();

    let result = JpqlRenderer::new(config.context().unwrap())
        .render(&query, config.mode)
        .unwrap();
    assert_eq!(result.query, "SELECT UCASE(b.title) FROM Book AS b");
}

#[test]
fn test_default_context_covers_builtin_kinds() {
    let context = RenderContext::default();
    for kind in [
        NodeKind::SELECT_QUERY,
        NodeKind::JOIN,
        NodeKind::LITERAL,
        NodeKind::IN_SUBQUERY,
        NodeKind::CURRENT_TIME,
        NodeKind::COUNT,
        NodeKind::FUNCTION,
    ] {
        assert!(context.contains(&kind), "missing {}", kind);
    }
    assert!(!context.contains(&NodeKind::from("soundex")));
}

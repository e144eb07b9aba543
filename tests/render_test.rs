use jpql_render::ast::visit::count_literals;
use jpql_render::prelude::*;
use pretty_assertions::assert_eq;

fn book() -> EntityRef {
    EntityRef::new("Book", "b")
}

#[test]
fn test_lower_literal_in_both_modes() {
    let b = book();
    let query: Query = SelectQuery::new("String", vec![Expr::lower(Expr::lit("Foo"))], b).into();

    let inline = jpql_render::render(&query, RenderMode::Inline).unwrap();
    assert_eq!(inline.query, "SELECT LOWER('Foo') FROM Book AS b");
    assert!(inline.params.is_empty());

    let bound = jpql_render::render(&query, RenderMode::Placeholder).unwrap();
    assert_eq!(bound.query, "SELECT LOWER(:param1) FROM Book AS b");
    assert_eq!(bound.params.len(), 1);
    assert_eq!(bound.params["param1"], Value::from("Foo"));
}

#[test]
fn test_current_time_ignores_mode() {
    let b = book();
    let query: Query = SelectQuery::new("Time", vec![Expr::CurrentTime], b).into();
    for mode in [RenderMode::Inline, RenderMode::Placeholder] {
        let result = jpql_render::render(&query, mode).unwrap();
        assert_eq!(result.query, "SELECT CURRENT_TIME() FROM Book AS b");
        assert!(result.params.is_empty());
    }
}

#[test]
fn test_update_without_assignments_fails() {
    let query: Query = UpdateQuery {
        entity: book(),
        set: vec![],
        where_clause: Some(Expr::path("b.id").equal(Expr::lit(1))),
    }
    .into();
    let err = jpql_render::render(&query, RenderMode::Placeholder).unwrap_err();
    assert!(matches!(err, RenderError::InvalidQueryShape(_)));
}

#[test]
fn test_precedence_in_full_query() {
    let b = book();
    let sum = Expr::arithmetic(b.path("price"), ArithmeticOp::Add, b.path("tax"));
    let query: Query = SelectQuery::new(
        "BigDecimal",
        vec![
            Expr::arithmetic(
                b.path("price"),
                ArithmeticOp::Add,
                Expr::arithmetic(b.path("tax"), ArithmeticOp::Mul, b.path("rate")),
            ),
            Expr::arithmetic(sum, ArithmeticOp::Mul, b.path("rate")).alias("gross"),
        ],
        b,
    )
    .into();

    let result = jpql_render::render(&query, RenderMode::Inline).unwrap();
    assert_eq!(
        result.query,
        "SELECT b.price + b.tax * b.rate, (b.price + b.tax) * b.rate AS gross FROM Book AS b"
    );
}

#[test]
fn test_every_placeholder_is_bound() {
    let b = book();
    let a = EntityRef::new("Author", "a");
    let inner = SelectQuery::new("Long", vec![a.path("id")], a.clone())
        .filter(a.path("born").greater_than(Expr::lit(1950)));
    let mut query = SelectQuery::new("Book", vec![Expr::entity(&b)], b.clone()).filter(Expr::and(vec![
        Expr::InSubquery {
            value: Box::new(b.path("authorId")),
            subquery: Box::new(inner),
            negated: false,
        },
        Expr::In {
            value: Box::new(b.path("genre")),
            list: vec![Expr::lit("sf"), Expr::lit("fantasy")],
            negated: false,
        },
    ]));
    query.order_by = vec![Sort::asc(Expr::Coalesce(vec![b.path("subtitle"), Expr::lit("")]))];
    let query: Query = query.into();

    let result = jpql_render::render(&query, RenderMode::Placeholder).unwrap();
    assert_eq!(
        result.query,
        "SELECT b FROM Book AS b WHERE b.authorId IN (SELECT a.id FROM Author AS a WHERE a.born > :param1) \
         AND b.genre IN (:param2, :param3) ORDER BY COALESCE(b.subtitle, :param4) ASC"
    );
    assert_eq!(result.params.len(), count_literals(&query));
    assert_eq!(
        result.params.values().cloned().collect::<Vec<_>>(),
        vec![Value::Int(1950), Value::from("sf"), Value::from("fantasy"), Value::from("")]
    );
}

#[test]
fn test_missing_binding_produces_no_text() {
    let b = book();
    let query: Query = DeleteQuery {
        entity: b.clone(),
        where_clause: Some(b.path("isbn").equal(Expr::param("isbn"))),
    }
    .into();

    let mut params = Params::new();
    params.insert("title".to_string(), Value::from("Dune"));

    let err = JpqlRenderer::default()
        .render_with_params(&query, &params, RenderMode::Inline)
        .unwrap_err();
    assert!(matches!(err, RenderError::MissingParameterBinding(name) if name == "isbn"));

    params.insert("isbn".to_string(), Value::from("978-0441013593"));
    let result = JpqlRenderer::default()
        .render_with_params(&query, &params, RenderMode::Inline)
        .unwrap();
    assert_eq!(result.query, "DELETE FROM Book AS b WHERE b.isbn = :isbn");
    assert_eq!(result.params.len(), 1);
}

#[test]
fn test_inline_mode_rejects_binary_literal() {
    let b = book();
    let query: Query = SelectQuery::new("Book", vec![Expr::entity(&b)], b.clone())
        .filter(b.path("cover").equal(Expr::lit(vec![0xffu8, 0xd8])))
        .into();

    let err = jpql_render::render(&query, RenderMode::Inline).unwrap_err();
    assert!(matches!(err, RenderError::UnsupportedValue(_)));

    let result = jpql_render::render(&query, RenderMode::Placeholder).unwrap();
    assert_eq!(result.params["param1"], Value::Bytes(vec![0xff, 0xd8]));
}

#[test]
fn test_render_from_json_model() {
    let json = r#"{
        "select": {
            "result_type": "Book",
            "select": [{ "entity": { "name": "Book", "alias": "b" } }],
            "from": [{ "entity": { "name": "Book", "alias": "b" } }],
            "where": {
                "comparison": {
                    "op": "gt",
                    "left": { "path": { "segments": ["b", "pages"] } },
                    "right": { "literal": { "type": "int", "value": 300 } }
                }
            },
            "order_by": [{ "expr": { "path": { "segments": ["b", "title"] } }, "order": "desc" }]
        }
    }"#;
    let query: Query = serde_json::from_str(json).unwrap();
    assert_eq!(query.kind_name(), "select");
    assert_eq!(query.result_type(), Some("Book"));

    let result = jpql_render::render(&query, RenderMode::Placeholder).unwrap();
    assert_eq!(
        result.query,
        "SELECT b FROM Book AS b WHERE b.pages > :param1 ORDER BY b.title DESC"
    );

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["query"], result.query.as_str());
    assert_eq!(json["params"]["param1"]["value"], 300);
}

#[test]
fn test_renders_are_deterministic_across_threads() {
    let b = book();
    let query: Query = SelectQuery::new("Book", vec![Expr::entity(&b)], b.clone())
        .filter(Expr::or(vec![
            b.path("price").less_than(Expr::lit(10.5)),
            Expr::not(b.path("title").equal(Expr::lit("O'Hara"))),
        ]))
        .into();
    let renderer = JpqlRenderer::default();
    let expected = renderer.render(&query, RenderMode::Placeholder).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| renderer.render(&query, RenderMode::Placeholder).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });

    let inline = renderer.render(&query, RenderMode::Inline).unwrap();
    assert_eq!(
        inline.query,
        "SELECT b FROM Book AS b WHERE b.price < 10.5 OR NOT b.title = 'O''Hara'"
    );
}

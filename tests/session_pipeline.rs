//! Session pipeline against an in-memory backend and surface
//!
//! The backend knows a fixed set of level-set texts and evaluates each with a
//! plain Rust function, so the tests check the wiring (expansion, transforms,
//! binding of axis names, NaN mapping) rather than any algebra.
//!
//! Run with: cargo test --test session_pipeline

use std::cell::RefCell;
use std::collections::HashMap;

use dimexpand::{
    BackendError, EquationError, FunctionError, Params, RenderSurface, SampleGrid, Session,
    SessionError, ShapeColor, ShapeStyle, SymbolTable, SymbolicBackend,
};
use pretty_assertions::assert_eq;

type Field = fn(&HashMap<&str, f64>) -> Result<f64, BackendError>;

const CIRCLE: &str = "((x^2) + (y^2)) - (5^2)";
const SPHERE: &str = "((x^2) + (y^2) + (z^2)) - (5^2)";
const LINE: &str = "x - (0)";
const RECIPROCAL: &str = "1/x - (1)";

// Function bodies, expanded for 2D with the parameters left free
const CIRCLE_OF_RADIUS: &str = "((x^2) + (y^2)) - r^2";
const UNIT_CIRCLE: &str = "((x^2) + (y^2)) - 1";

// `x^2 = y = 2*x`: its parts, then its pairwise level sets
const PARABOLA: &str = "x^2";
const ORDINATE: &str = "y";
const DOUBLED: &str = "2*x";
const PARABOLA_MEETS_LINE: [&str; 2] = ["x^2 - (y)", "y - (2*x)"];

#[derive(Default)]
struct TableBackend {
    fields: HashMap<&'static str, Field>,
    parsed: RefCell<Vec<(String, SymbolTable)>>,
}

impl TableBackend {
    fn new() -> Self {
        let mut fields: HashMap<&'static str, Field> = HashMap::new();
        fields.insert(CIRCLE, |v| Ok(v["x"].powi(2) + v["y"].powi(2) - 25.0));
        fields.insert(SPHERE, |v| {
            Ok(v["x"].powi(2) + v["y"].powi(2) + v["z"].powi(2) - 25.0)
        });
        fields.insert(LINE, |v| Ok(v["x"]));
        fields.insert(RECIPROCAL, |v| {
            if v["x"] == 0.0 {
                Err(BackendError::Evaluation("division by zero".into()))
            } else {
                Ok(1.0 / v["x"] - 1.0)
            }
        });
        fields.insert(CIRCLE_OF_RADIUS, |v| {
            Ok(v["x"].powi(2) + v["y"].powi(2) - v["r"].powi(2))
        });
        fields.insert(UNIT_CIRCLE, |v| Ok(v["x"].powi(2) + v["y"].powi(2) - 1.0));
        fields.insert(PARABOLA, |v| Ok(v["x"].powi(2)));
        fields.insert(ORDINATE, |v| Ok(v["y"]));
        fields.insert(DOUBLED, |v| Ok(2.0 * v["x"]));
        fields.insert(PARABOLA_MEETS_LINE[0], |v| Ok(v["x"].powi(2) - v["y"]));
        fields.insert(PARABOLA_MEETS_LINE[1], |v| Ok(v["y"] - 2.0 * v["x"]));
        Self {
            fields,
            parsed: RefCell::default(),
        }
    }
}

impl SymbolicBackend for TableBackend {
    type Expr = &'static str;

    fn parse(&self, text: &str, symbols: &SymbolTable) -> Result<Self::Expr, BackendError> {
        self.parsed
            .borrow_mut()
            .push((text.to_string(), symbols.clone()));
        self.fields
            .get_key_value(text)
            .map(|(key, _)| *key)
            .ok_or_else(|| BackendError::Parse(format!("cannot parse {:?}", text)))
    }

    fn evaluate(&self, expr: &Self::Expr, bindings: &[(&str, f64)]) -> Result<f64, BackendError> {
        let values: HashMap<&str, f64> = bindings.iter().copied().collect();
        let field = self
            .fields
            .get(expr)
            .ok_or_else(|| BackendError::Evaluation(format!("unknown expression {:?}", expr)))?;
        field(&values)
    }

    fn solve_for(&self, expr: &Self::Expr, variable: &str) -> Result<Vec<Self::Expr>, BackendError> {
        if expr.contains(variable) {
            Ok(vec![*expr])
        } else {
            Err(BackendError::Solve(format!("{} does not appear", variable)))
        }
    }

    fn solve_system(
        &self,
        exprs: &[Self::Expr],
        variables: &[&str],
    ) -> Result<Vec<HashMap<String, Self::Expr>>, BackendError> {
        let solution = |pairs: &[(&str, &'static str)]| -> HashMap<String, Self::Expr> {
            pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
        };
        match (exprs, variables) {
            (&[a, b], &["x", "y"]) if [a, b] == PARABOLA_MEETS_LINE => Ok(vec![
                solution(&[("x", "0"), ("y", "0")]),
                solution(&[("x", "2"), ("y", "4")]),
            ]),
            _ => Err(BackendError::Solve(format!(
                "no solution table for {:?} in {:?}",
                exprs, variables
            ))),
        }
    }
}

/// Samples every field along the grid diagonal
#[derive(Default)]
struct RecordingSurface {
    drawn: Vec<(ShapeStyle, Vec<f64>)>,
}

impl RenderSurface for RecordingSurface {
    fn render(
        &mut self,
        field: &dyn Fn(&[f64]) -> f64,
        grid: &SampleGrid,
        style: &ShapeStyle,
    ) -> Result<(), BackendError> {
        let axes: Vec<Vec<f64>> = (0..grid.dimension()).map(|a| grid.axis_values(a)).collect();
        let samples = (0..grid.resolution)
            .map(|i| {
                let point: Vec<f64> = axes.iter().map(|values| values[i]).collect();
                field(&point)
            })
            .collect();
        self.drawn.push((style.clone(), samples));
        Ok(())
    }
}

fn session() -> Session<TableBackend> {
    Session::new(TableBackend::new())
}

#[test]
fn identity_is_expanded_parsed_and_named() {
    let mut session = session();
    let id = session
        .add_identity("Circle/Sphere", 2, &Params::new())
        .unwrap();

    let shape = session.shape(id).unwrap();
    assert_eq!(shape.name, "Circle/Sphere");
    assert_eq!(shape.equation, "((x^2) + (y^2)) = 5^2");
    assert_eq!(shape.color, ShapeColor::Blue);

    let parsed = session.backend().parsed.borrow();
    assert_eq!(parsed[0].0, CIRCLE);
    assert_eq!(parsed[0].1.axes, vec!["x", "y"]);
    assert!(parsed[0].1.params.is_empty());
}

#[test]
fn evaluation_applies_the_shape_transform() {
    let mut session = session();
    let id = session
        .add_notation("sum(Dim^2) = r^2", 2, &Params::new().with("r", 5.0), None)
        .unwrap();
    assert_eq!(session.shape(id).unwrap().name, "Shape 1");

    assert_eq!(session.evaluate_shape(id, &[5.0, 0.0]).unwrap(), 0.0);
    assert_eq!(session.evaluate_shape(id, &[0.0, 0.0]).unwrap(), -25.0);

    session.shape_mut(id).unwrap().set_translation(3.0, 0.0, 0.0);
    assert_eq!(session.evaluate_shape(id, &[8.0, 0.0]).unwrap(), 0.0);
    assert_eq!(session.evaluate_shape(id, &[3.0, 0.0]).unwrap(), -25.0);
}

#[test]
fn rotation_is_applied_before_binding_axes() {
    let mut session = session();
    let id = session.add_equation("x = 0", 2, Some("Axis")).unwrap();
    session
        .shape_mut(id)
        .unwrap()
        .set_rotation_euler(0.0, 0.0, 90.0);

    let value = session.evaluate_shape(id, &[0.0, 1.0]).unwrap();
    assert!((value - 1.0).abs() < 1e-9, "got {}", value);
}

#[test]
fn point_must_match_shape_dimension() {
    let mut session = session();
    let id = session.add_identity("Circle/Sphere", 3, &Params::new()).unwrap();

    assert_eq!(
        session.evaluate_shape(id, &[1.0, 2.0]),
        Err(SessionError::PointDimension {
            expected: 3,
            got: 2
        })
    );
    assert_eq!(session.evaluate_shape(id, &[5.0, 0.0, 0.0]).unwrap(), 0.0);
}

#[test]
fn failures_add_nothing() {
    let mut session = session();

    let err = session.add_equation("x^3 = y", 2, None).unwrap_err();
    assert!(matches!(err, SessionError::Backend(BackendError::Parse(_))));

    let err = session
        .add_notation("sum(Dim^2 = 1", 2, &Params::new(), None)
        .unwrap_err();
    assert!(matches!(err, SessionError::Expand(_)));

    let err = session.add_equation("x = y = 1", 2, None).unwrap_err();
    assert!(matches!(err, SessionError::Equation(_)));

    let err = session
        .add_identity("Torus", 2, &Params::new())
        .unwrap_err();
    assert!(matches!(err, SessionError::Expand(_)));

    assert!(session.shapes().is_empty());
}

#[test]
fn solve_and_remove() {
    let mut session = session();
    let id = session.add_equation("x = 0", 2, None).unwrap();

    assert_eq!(session.solve_shape(id, "x").unwrap(), vec![LINE]);
    assert!(matches!(
        session.solve_shape(id, "q"),
        Err(SessionError::Backend(BackendError::Solve(_)))
    ));

    assert!(session.remove_shape(id).is_some());
    assert_eq!(
        session.evaluate_shape(id, &[0.0, 0.0]),
        Err(SessionError::UnknownShape(id))
    );
}

#[test]
fn render_draws_visible_shapes_of_the_grid_dimension() {
    let mut session = session();
    session.add_identity("Circle/Sphere", 2, &Params::new()).unwrap();
    let hidden = session.add_equation("x = 0", 2, None).unwrap();
    session.add_identity("Circle/Sphere", 3, &Params::new()).unwrap();
    session.add_equation("1/x = 1", 2, Some("Reciprocal")).unwrap();
    session.shape_mut(hidden).unwrap().visible = false;

    let mut surface = RecordingSurface::default();
    let rendered = session
        .render(&mut surface, &SampleGrid::square(-1.0, 1.0, 3))
        .unwrap();
    assert_eq!(rendered, 2);

    let (circle_style, circle) = &surface.drawn[0];
    assert_eq!(circle_style.name, "Circle/Sphere");
    assert_eq!(circle, &vec![-23.0, -25.0, -23.0]);

    // Evaluation failures show up as NaN rather than aborting the render
    let (reciprocal_style, reciprocal) = &surface.drawn[1];
    assert_eq!(reciprocal_style.name, "Reciprocal");
    assert_eq!(reciprocal_style.color, ShapeColor::Purple);
    assert_eq!(reciprocal[0], -2.0);
    assert!(reciprocal[1].is_nan());
    assert_eq!(reciprocal[2], 0.0);

    let mut surface = RecordingSurface::default();
    let rendered = session
        .render(&mut surface, &SampleGrid::cube(-5.0, 5.0, 2))
        .unwrap();
    assert_eq!(rendered, 1);
    assert_eq!(surface.drawn[0].1, vec![50.0, 50.0]);
}

#[test]
fn function_body_is_expanded_once_and_bound_at_evaluation() {
    let mut session = session();
    let name = session
        .define_function("Circle(r) = sum(Dim^2) - r^2", 2)
        .unwrap();
    assert_eq!(name, "Circle");

    let def = session.function("Circle").unwrap();
    assert_eq!(def.params, vec!["r"]);
    assert_eq!(def.expanded, CIRCLE_OF_RADIUS);
    assert_eq!(def.dimension, 2);
    assert_eq!(def.definition, "Circle(r) = sum(Dim^2) - r^2");
    {
        let parsed = session.backend().parsed.borrow();
        let (text, symbols) = parsed.last().unwrap();
        assert_eq!(text, CIRCLE_OF_RADIUS);
        assert_eq!(symbols.params, vec!["r"]);
    }

    assert_eq!(session.evaluate_function("Circle", &[5.0], &[3.0, 4.0]).unwrap(), 0.0);
    assert_eq!(session.evaluate_function("Circle", &[1.0], &[0.0, 0.0]).unwrap(), -1.0);

    session.define_function("Unit() = sum(Dim^2) - 1", 2).unwrap();
    assert_eq!(session.evaluate_function("Unit", &[], &[1.0, 0.0]).unwrap(), 0.0);

    // Redefinition replaces in place
    session
        .define_function("Circle(r) = sum(Dim^2) - r^2", 2)
        .unwrap();
    assert_eq!(session.function_names(), vec!["Circle", "Unit"]);
    assert_eq!(session.functions().len(), 2);

    // Clearing shapes keeps functions
    session.clear();
    assert!(session.function("Unit").is_some());
}

#[test]
fn function_definition_and_call_errors() {
    let mut session = session();

    assert_eq!(
        session.define_function("Bad(x) = sum(Dim^2) - x", 2),
        Err(SessionError::Function(FunctionError::ReservedName("x".into())))
    );
    assert_eq!(
        session.define_function("sum(r) = r", 2),
        Err(SessionError::Function(FunctionError::ReservedName("sum".into())))
    );
    assert!(matches!(
        session.define_function("Circle r = sum(Dim^2)", 2),
        Err(SessionError::Function(FunctionError::Syntax(_)))
    ));
    assert!(matches!(
        session.define_function("Cube(s) = sum(Dim^3) - s", 2),
        Err(SessionError::Backend(BackendError::Parse(_)))
    ));
    assert!(matches!(
        session.define_function("Broken(s) = sum(Dim^2 - s", 2),
        Err(SessionError::Expand(_))
    ));
    assert!(session.function_names().is_empty());

    session
        .define_function("Circle(r) = sum(Dim^2) - r^2", 2)
        .unwrap();
    assert_eq!(
        session.evaluate_function("Ellipse", &[1.0], &[0.0, 0.0]),
        Err(SessionError::UnknownFunction("Ellipse".into()))
    );
    assert_eq!(
        session.evaluate_function("Circle", &[1.0, 2.0], &[0.0, 0.0]),
        Err(SessionError::Arity {
            name: "Circle".into(),
            expected: 1,
            got: 2
        })
    );
    assert_eq!(
        session.evaluate_function("Circle", &[1.0], &[0.0, 0.0, 0.0]),
        Err(SessionError::PointDimension {
            expected: 2,
            got: 3
        })
    );
}

#[test]
fn chain_parts_are_evaluated_under_shared_bindings() {
    let session = session();

    let on_both = session
        .evaluate_chain("x^2 = y = 2*x", 2, &[("x", 2.0), ("y", 4.0)])
        .unwrap();
    assert_eq!(on_both, vec![4.0, 4.0, 4.0]);

    let off_line = session
        .evaluate_chain("x^2 = y = 2*x", 2, &[("x", 1.0), ("y", 1.0)])
        .unwrap();
    assert_eq!(off_line, vec![1.0, 1.0, 2.0]);

    assert!(matches!(
        session.evaluate_chain("x^2", 2, &[("x", 1.0)]),
        Err(SessionError::Equation(EquationError::MissingEquals(_)))
    ));
    assert!(matches!(
        session.evaluate_chain("x^2 = = y", 2, &[]),
        Err(SessionError::Equation(EquationError::EmptySide(_)))
    ));
}

#[test]
fn chain_is_solved_as_a_pairwise_system() {
    let session = session();

    let solutions = session
        .solve_chain("x^2 = y = 2*x", 2, &["x", "y"])
        .unwrap();
    assert_eq!(solutions.len(), 2);
    assert_eq!(solutions[1]["x"], "2");
    assert_eq!(solutions[1]["y"], "4");

    let parsed: Vec<String> = session
        .backend()
        .parsed
        .borrow()
        .iter()
        .map(|(text, _)| text.clone())
        .collect();
    assert_eq!(parsed, PARABOLA_MEETS_LINE);

    assert!(matches!(
        session.solve_chain("x^2 = y = 2*x", 2, &["x"]),
        Err(SessionError::Backend(BackendError::Solve(_)))
    ));
}

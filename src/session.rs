//! Shape workspace
//!
//! Ties the expander and identity library to an external symbolic backend:
//! notation is expanded to text, the text is parsed once by the backend, and
//! the parsed level-set is kept alongside the placed [`Shape`].
//!
//! The session also holds user-defined functions and evaluates or solves
//! multi-form chains such as `x^2 = y = 2*x`.

use std::collections::HashMap;

use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::{RenderSurface, SampleGrid, ShapeStyle, SymbolTable, SymbolicBackend};
use crate::equation::{chain_parts, level_set, split_chain};
use crate::error::{FunctionError, SessionError};
use crate::functions::{parse_definition, FunctionDefinition, FunctionRegistry};
use crate::identities::IdentityLibrary;
use crate::notation::{Params, TemplateExpander};
use crate::shapes::{Shape, ShapeManager};

/// Shapes plus their parsed level-set expressions
pub struct Session<B: SymbolicBackend> {
    expander: TemplateExpander,
    library: IdentityLibrary,
    shapes: ShapeManager,
    backend: B,
    /// Shape id → parsed `lhs - (rhs)`
    compiled: HashMap<Uuid, B::Expr>,
    functions: FunctionRegistry,
    /// Function name → parsed expanded body
    function_exprs: HashMap<String, B::Expr>,
}

impl<B: SymbolicBackend> Session<B> {
    /// Session with default axis names and the built-in identities
    pub fn new(backend: B) -> Self {
        Self::with_library(backend, IdentityLibrary::with_builtins())
    }

    pub fn with_library(backend: B, library: IdentityLibrary) -> Self {
        Self {
            expander: TemplateExpander::new(),
            library,
            shapes: ShapeManager::new(),
            backend,
            compiled: HashMap::new(),
            functions: FunctionRegistry::new(),
            function_exprs: HashMap::new(),
        }
    }

    pub fn with_expander(mut self, expander: TemplateExpander) -> Self {
        self.expander = expander;
        self
    }

    pub fn expander(&self) -> &TemplateExpander {
        &self.expander
    }

    pub fn library(&self) -> &IdentityLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut IdentityLibrary {
        &mut self.library
    }

    pub fn shapes(&self) -> &ShapeManager {
        &self.shapes
    }

    pub fn shape(&self, id: Uuid) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Mutable access for transform and visibility edits
    pub fn shape_mut(&mut self, id: Uuid) -> Option<&mut Shape> {
        self.shapes.get_mut(id)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Parse an already expanded equation and add it as a shape
    ///
    /// Nothing is added if the backend rejects the text.
    pub fn add_equation(
        &mut self,
        equation: &str,
        dimension: usize,
        name: Option<&str>,
    ) -> Result<Uuid, SessionError> {
        let symbols = SymbolTable::for_dimension(self.expander.axes(), dimension)?;
        let level = level_set(equation)?;
        let expr = self.backend.parse(&level, &symbols)?;

        let id = self.shapes.add(equation.trim(), dimension, name).id;
        self.compiled.insert(id, expr);
        Ok(id)
    }

    /// Expand notation, then add the result as a shape
    pub fn add_notation(
        &mut self,
        notation: &str,
        dimension: usize,
        params: &Params,
        name: Option<&str>,
    ) -> Result<Uuid, SessionError> {
        let equation = self.expander.expand(notation, dimension, params)?;
        self.add_equation(&equation, dimension, name)
    }

    /// Expand a library identity and add it, named after the identity
    pub fn add_identity(
        &mut self,
        name: &str,
        dimension: usize,
        overrides: &Params,
    ) -> Result<Uuid, SessionError> {
        let equation =
            self.expander
                .expand_identity(&self.library, name, dimension, overrides)?;
        info!("Adding identity {:?} in {}D", name, dimension);
        self.add_equation(&equation, dimension, Some(name))
    }

    pub fn remove_shape(&mut self, id: Uuid) -> Option<Shape> {
        self.compiled.remove(&id);
        self.shapes.remove(id)
    }

    /// Remove every shape; defined functions are kept
    pub fn clear(&mut self) {
        self.compiled.clear();
        self.shapes.clear();
    }

    /// Level-set value of a shape at a world point
    ///
    /// Zero on the boundary; the sign tells the two sides apart.
    pub fn evaluate_shape(&self, id: Uuid, point: &[f64]) -> Result<f64, SessionError> {
        let (shape, expr) = self.lookup(id)?;
        if point.len() != shape.dimension {
            return Err(SessionError::PointDimension {
                expected: shape.dimension,
                got: point.len(),
            });
        }

        let axes = self.expander.axes().coords(shape.dimension)?;
        let local = shape.to_local(point);
        let bindings = bind(axes, &local);
        Ok(self.backend.evaluate(expr, &bindings)?)
    }

    /// Solve a shape's level-set for one variable
    pub fn solve_shape(&self, id: Uuid, variable: &str) -> Result<Vec<B::Expr>, SessionError> {
        let (_, expr) = self.lookup(id)?;
        Ok(self.backend.solve_for(expr, variable)?)
    }

    /// Hand every visible shape matching the grid's dimension to `surface`
    ///
    /// Returns the number of shapes rendered. Points where the backend cannot
    /// evaluate come through as NaN.
    pub fn render<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        grid: &SampleGrid,
    ) -> Result<usize, SessionError> {
        let mut rendered = 0;

        for shape in self.shapes.visible() {
            if shape.dimension != grid.dimension() {
                debug!(
                    "Skipping {:?}: {}D shape on a {}D grid",
                    shape.name,
                    shape.dimension,
                    grid.dimension()
                );
                continue;
            }
            let Some(expr) = self.compiled.get(&shape.id) else {
                continue;
            };

            let axes = self.expander.axes().coords(shape.dimension)?;
            let field = |point: &[f64]| {
                let local = shape.to_local(point);
                self.backend
                    .evaluate(expr, &bind(axes, &local))
                    .unwrap_or(f64::NAN)
            };
            let style = ShapeStyle {
                name: shape.name.clone(),
                color: shape.color,
            };

            surface.render(&field, grid, &style)?;
            rendered += 1;
        }

        debug!("Rendered {} shapes", rendered);
        Ok(rendered)
    }

    /// Define `name(params) = body`, expanding the body for `dimension`
    ///
    /// Returns the function name. Redefining a name replaces it. Parameters
    /// may not shadow the dimension's axis names.
    pub fn define_function(
        &mut self,
        definition: &str,
        dimension: usize,
    ) -> Result<String, SessionError> {
        let signature = parse_definition(definition)?;
        let symbols = SymbolTable::for_dimension(self.expander.axes(), dimension)?;
        if let Some(param) = signature.params.iter().find(|p| symbols.axes.contains(*p)) {
            return Err(FunctionError::ReservedName(param.clone()).into());
        }

        let expanded = self
            .expander
            .expand(&signature.body, dimension, &Params::new())?;
        let symbols = symbols.with_params(&signature.params);
        let expr = self.backend.parse(&expanded, &symbols)?;

        info!(
            "Defined {}({}) in {}D",
            signature.name,
            signature.params.join(", "),
            dimension
        );
        let name = signature.name;
        self.function_exprs.insert(name.clone(), expr);
        self.functions.register(FunctionDefinition {
            name: name.clone(),
            params: signature.params,
            body: signature.body,
            expanded,
            dimension,
            definition: definition.trim().to_string(),
        });
        Ok(name)
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.get(name)
    }

    /// Function names in definition order
    pub fn function_names(&self) -> Vec<&str> {
        self.functions.names()
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Evaluate a function with its arguments at a point
    pub fn evaluate_function(
        &self,
        name: &str,
        args: &[f64],
        point: &[f64],
    ) -> Result<f64, SessionError> {
        let (def, expr) = self
            .functions
            .get(name)
            .zip(self.function_exprs.get(name))
            .ok_or_else(|| SessionError::UnknownFunction(name.to_string()))?;

        if args.len() != def.params.len() {
            return Err(SessionError::Arity {
                name: name.to_string(),
                expected: def.params.len(),
                got: args.len(),
            });
        }
        if point.len() != def.dimension {
            return Err(SessionError::PointDimension {
                expected: def.dimension,
                got: point.len(),
            });
        }

        let axes = self.expander.axes().coords(def.dimension)?;
        let mut bindings = bind(axes, point);
        bindings.extend(bind(&def.params, args));
        Ok(self.backend.evaluate(expr, &bindings)?)
    }

    /// Value of every part of `A = B = C` under the same bindings
    ///
    /// Equal values mean the point satisfies the whole chain.
    pub fn evaluate_chain(
        &self,
        equation: &str,
        dimension: usize,
        bindings: &[(&str, f64)],
    ) -> Result<Vec<f64>, SessionError> {
        let symbols = SymbolTable::for_dimension(self.expander.axes(), dimension)?;
        chain_parts(equation)?
            .into_iter()
            .map(|part| -> Result<f64, SessionError> {
                let expr = self.backend.parse(part, &symbols)?;
                Ok(self.backend.evaluate(&expr, bindings)?)
            })
            .collect()
    }

    /// Solve `A = B = C` as the system `A = B`, `B = C`
    pub fn solve_chain(
        &self,
        equation: &str,
        dimension: usize,
        variables: &[&str],
    ) -> Result<Vec<HashMap<String, B::Expr>>, SessionError> {
        let symbols = SymbolTable::for_dimension(self.expander.axes(), dimension)?;
        let exprs = split_chain(equation)?
            .iter()
            .map(|sides| self.backend.parse(&sides.level_set(), &symbols))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Solving {} equations for {:?}", exprs.len(), variables);
        Ok(self.backend.solve_system(&exprs, variables)?)
    }

    fn lookup(&self, id: Uuid) -> Result<(&Shape, &B::Expr), SessionError> {
        let shape = self.shapes.get(id).ok_or(SessionError::UnknownShape(id))?;
        let expr = self
            .compiled
            .get(&id)
            .ok_or(SessionError::UnknownShape(id))?;
        Ok((shape, expr))
    }
}

fn bind<'a>(axes: &'a [String], values: &[f64]) -> Vec<(&'a str, f64)> {
    axes.iter()
        .map(String::as_str)
        .zip(values.iter().copied())
        .collect()
}

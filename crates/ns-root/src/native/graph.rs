//! In-memory `TGraph` family: plain, symmetric and asymmetric errors, and the
//! 2D scatter surfaces.

use ns_core::{Error, Result};

use crate::class::RootClass;

/// Error components attached to graph points.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphErrors {
    /// `TGraph` / `TGraph2D`.
    None,
    /// `TGraphErrors`.
    Symmetric {
        /// Error on x.
        ex: Vec<f64>,
        /// Error on y.
        ey: Vec<f64>,
    },
    /// `TGraphAsymmErrors`.
    Asymmetric {
        /// Low error on x.
        exl: Vec<f64>,
        /// High error on x.
        exh: Vec<f64>,
        /// Low error on y.
        eyl: Vec<f64>,
        /// High error on y.
        eyh: Vec<f64>,
    },
}

/// A graph of N points.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    class: RootClass,
    name: String,
    title: String,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Option<Vec<f64>>,
    errors: GraphErrors,
    x_title: String,
    y_title: String,
}

fn check_len(what: &str, n: usize, got: usize) -> Result<()> {
    if n != got {
        return Err(Error::Validation(format!(
            "graph array '{}' has {} points, expected {}",
            what, got, n
        )));
    }
    Ok(())
}

impl Graph {
    fn build(class: RootClass, x: Vec<f64>, y: Vec<f64>, z: Option<Vec<f64>>, errors: GraphErrors) -> Result<Self> {
        let n = x.len();
        check_len("y", n, y.len())?;
        if let Some(z) = &z {
            check_len("z", n, z.len())?;
        }
        match &errors {
            GraphErrors::None => {}
            GraphErrors::Symmetric { ex, ey } => {
                check_len("ex", n, ex.len())?;
                check_len("ey", n, ey.len())?;
            }
            GraphErrors::Asymmetric { exl, exh, eyl, eyh } => {
                check_len("exl", n, exl.len())?;
                check_len("exh", n, exh.len())?;
                check_len("eyl", n, eyl.len())?;
                check_len("eyh", n, eyh.len())?;
            }
        }
        Ok(Self {
            class,
            name: if class.inherits_from(RootClass::TGraph2D) { "Graph2D" } else { "Graph" }.to_string(),
            title: String::new(),
            x,
            y,
            z,
            errors,
            x_title: String::new(),
            y_title: String::new(),
        })
    }

    /// Plain `TGraph`.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        Self::build(RootClass::TGraph, x, y, None, GraphErrors::None)
    }

    /// `TGraphErrors` with symmetric errors.
    pub fn with_errors(x: Vec<f64>, y: Vec<f64>, ex: Vec<f64>, ey: Vec<f64>) -> Result<Self> {
        Self::build(RootClass::TGraphErrors, x, y, None, GraphErrors::Symmetric { ex, ey })
    }

    /// `TGraphAsymmErrors`.
    pub fn with_asymm_errors(
        x: Vec<f64>,
        y: Vec<f64>,
        exl: Vec<f64>,
        exh: Vec<f64>,
        eyl: Vec<f64>,
        eyh: Vec<f64>,
    ) -> Result<Self> {
        Self::build(
            RootClass::TGraphAsymmErrors,
            x,
            y,
            None,
            GraphErrors::Asymmetric { exl, exh, eyl, eyh },
        )
    }

    /// `TGraph2D` scatter surface.
    pub fn surface(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Result<Self> {
        Self::build(RootClass::TGraph2D, x, y, Some(z), GraphErrors::None)
    }

    /// Builder-style rename.
    pub fn named(mut self, name: impl Into<String>, title: impl Into<String>) -> Self {
        self.name = name.into();
        self.title = title.into();
        self
    }

    /// Concrete class.
    pub fn class(&self) -> RootClass {
        self.class
    }

    /// Graph name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Graph title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rename the graph.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Retitle the graph.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// X axis title.
    pub fn x_title(&self) -> &str {
        &self.x_title
    }

    /// Y axis title.
    pub fn y_title(&self) -> &str {
        &self.y_title
    }

    /// Set both axis titles.
    pub fn set_axis_titles(&mut self, x_title: impl Into<String>, y_title: impl Into<String>) {
        self.x_title = x_title.into();
        self.y_title = y_title.into();
    }

    /// Number of points.
    pub fn n_points(&self) -> usize {
        self.x.len()
    }

    /// X coordinates.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Y coordinates.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Z coordinates (empty unless a 2D surface).
    pub fn z(&self) -> &[f64] {
        self.z.as_deref().unwrap_or(&[])
    }

    /// Error components.
    pub fn errors(&self) -> &GraphErrors {
        &self.errors
    }

    /// Symmetric x errors, empty if absent.
    pub fn ex(&self) -> &[f64] {
        match &self.errors {
            GraphErrors::Symmetric { ex, .. } => ex,
            _ => &[],
        }
    }

    /// Symmetric y errors, empty if absent.
    pub fn ey(&self) -> &[f64] {
        match &self.errors {
            GraphErrors::Symmetric { ey, .. } => ey,
            _ => &[],
        }
    }

    /// Low x errors, empty if absent.
    pub fn ex_low(&self) -> &[f64] {
        match &self.errors {
            GraphErrors::Asymmetric { exl, .. } => exl,
            _ => &[],
        }
    }

    /// High x errors, empty if absent.
    pub fn ex_high(&self) -> &[f64] {
        match &self.errors {
            GraphErrors::Asymmetric { exh, .. } => exh,
            _ => &[],
        }
    }

    /// Low y errors, empty if absent.
    pub fn ey_low(&self) -> &[f64] {
        match &self.errors {
            GraphErrors::Asymmetric { eyl, .. } => eyl,
            _ => &[],
        }
    }

    /// High y errors, empty if absent.
    pub fn ey_high(&self) -> &[f64] {
        match &self.errors {
            GraphErrors::Asymmetric { eyh, .. } => eyh,
            _ => &[],
        }
    }
}

use foundation::color::Rgb;

/// A style-expression value: feature property, literal, or evaluation
/// result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Value {
    pub fn number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Filter truthiness: null and false exclude; zero and the empty
    /// string also exclude.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// Feature attributes as ordered pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    pub pairs: Vec<(String, Value)>,
}

impl Feature {
    pub fn new(pairs: Vec<(String, Value)>) -> Self {
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// The slice of a tile renderer's expression language this system needs:
/// data-driven dispatch tables and numeric ramps, evaluated engine-side.
///
/// Evaluation is a pure function of `(expression, feature, zoom)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    /// Feature property lookup; absent keys evaluate to null.
    Get(String),
    /// Current map zoom level.
    Zoom,
    /// First non-null argument, else null.
    Coalesce(Vec<Expr>),
    /// Ordered `(key, output)` dispatch table with a fallback.
    Match {
        input: Box<Expr>,
        cases: Vec<(Value, Value)>,
        fallback: Value,
    },
    /// `first` below the lowest stop, then the output of the highest stop
    /// whose threshold is <= input. Stops must be ascending.
    Step {
        input: Box<Expr>,
        first: Value,
        stops: Vec<(f64, Value)>,
    },
    /// Piecewise-linear interpolation between ascending stops. Hex-color
    /// stop outputs interpolate per RGB channel; numeric outputs lerp.
    InterpolateLinear {
        input: Box<Expr>,
        stops: Vec<(f64, Value)>,
    },
    /// Conjunction; true with no arguments.
    All(Vec<Expr>),
    Ge(Box<Expr>, f64),
    Le(Box<Expr>, f64),
    EqStr(Box<Expr>, String),
    Max(Vec<Expr>),
}

impl Expr {
    pub fn literal(v: impl Into<Value>) -> Self {
        Expr::Literal(v.into())
    }

    pub fn get(key: impl Into<String>) -> Self {
        Expr::Get(key.into())
    }

    pub fn coalesce(args: Vec<Expr>) -> Self {
        Expr::Coalesce(args)
    }

    pub fn ge(input: Expr, rhs: f64) -> Self {
        Expr::Ge(Box::new(input), rhs)
    }

    pub fn le(input: Expr, rhs: f64) -> Self {
        Expr::Le(Box::new(input), rhs)
    }

    pub fn eq_str(input: Expr, rhs: impl Into<String>) -> Self {
        Expr::EqStr(Box::new(input), rhs.into())
    }

    pub fn all(args: Vec<Expr>) -> Self {
        Expr::All(args)
    }

    pub fn step(input: Expr, first: impl Into<Value>, stops: Vec<(f64, Value)>) -> Self {
        Expr::Step {
            input: Box::new(input),
            first: first.into(),
            stops,
        }
    }

    pub fn interpolate_linear(input: Expr, stops: Vec<(f64, Value)>) -> Self {
        Expr::InterpolateLinear {
            input: Box::new(input),
            stops,
        }
    }

    pub fn match_table(input: Expr, cases: Vec<(Value, Value)>, fallback: impl Into<Value>) -> Self {
        Expr::Match {
            input: Box::new(input),
            cases,
            fallback: fallback.into(),
        }
    }

    pub fn max(args: Vec<Expr>) -> Self {
        Expr::Max(args)
    }
}

/// Evaluates `expr` against a feature at the given zoom.
pub fn eval(expr: &Expr, feature: &Feature, zoom: f64) -> Value {
    match expr {
        Expr::Literal(v) => v.clone(),
        Expr::Get(key) => feature.get(key).cloned().unwrap_or(Value::Null),
        Expr::Zoom => Value::Number(zoom),
        Expr::Coalesce(args) => {
            for arg in args {
                let v = eval(arg, feature, zoom);
                if !v.is_null() {
                    return v;
                }
            }
            Value::Null
        }
        Expr::Match {
            input,
            cases,
            fallback,
        } => {
            let v = eval(input, feature, zoom);
            for (key, out) in cases {
                if values_equal(key, &v) {
                    return out.clone();
                }
            }
            fallback.clone()
        }
        Expr::Step {
            input,
            first,
            stops,
        } => {
            let Some(x) = eval(input, feature, zoom).number() else {
                return Value::Null;
            };
            let mut out = first.clone();
            for (threshold, v) in stops {
                if x >= *threshold {
                    out = v.clone();
                } else {
                    break;
                }
            }
            out
        }
        Expr::InterpolateLinear { input, stops } => {
            let Some(x) = eval(input, feature, zoom).number() else {
                return Value::Null;
            };
            interpolate(x, stops)
        }
        Expr::All(args) => Value::Bool(
            args.iter()
                .all(|a| eval(a, feature, zoom).is_truthy()),
        ),
        Expr::Ge(input, rhs) => cmp_number(eval(input, feature, zoom), |x| x >= *rhs),
        Expr::Le(input, rhs) => cmp_number(eval(input, feature, zoom), |x| x <= *rhs),
        Expr::EqStr(input, rhs) => {
            let v = eval(input, feature, zoom);
            Value::Bool(v.as_str() == Some(rhs.as_str()))
        }
        Expr::Max(args) => {
            let mut best: Option<f64> = None;
            for arg in args {
                let Some(x) = eval(arg, feature, zoom).number() else {
                    continue;
                };
                best = Some(best.map_or(x, |b: f64| b.max(x)));
            }
            best.map(Value::Number).unwrap_or(Value::Null)
        }
    }
}

/// Filter evaluation: a feature passes when the expression is truthy.
pub fn matches(filter: &Expr, feature: &Feature, zoom: f64) -> bool {
    eval(filter, feature, zoom).is_truthy()
}

fn cmp_number(v: Value, pred: impl Fn(f64) -> bool) -> Value {
    match v.number() {
        Some(x) => Value::Bool(pred(x)),
        None => Value::Bool(false),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Null, Value::Null) => true,
        _ => false,
    }
}

fn interpolate(x: f64, stops: &[(f64, Value)]) -> Value {
    let Some((first_t, first_v)) = stops.first() else {
        return Value::Null;
    };
    if x <= *first_t {
        return first_v.clone();
    }
    if let Some((last_t, last_v)) = stops.last()
        && x >= *last_t
    {
        return last_v.clone();
    }

    for pair in stops.windows(2) {
        let (t0, v0) = &pair[0];
        let (t1, v1) = &pair[1];
        if x < *t0 || x > *t1 {
            continue;
        }
        let t = (x - t0) / (t1 - t0);

        if let (Some(a), Some(b)) = (v0.number(), v1.number()) {
            return Value::Number(a + (b - a) * t);
        }
        if let (Some(a), Some(b)) = (
            v0.as_str().and_then(Rgb::from_hex),
            v1.as_str().and_then(Rgb::from_hex),
        ) {
            return Value::Str(a.lerp(b, t).to_hex());
        }
        // Mixed stop kinds degrade to the lower stop.
        return v0.clone();
    }

    Value::Null
}

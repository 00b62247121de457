//! Native values that literals cast to. The optimizer folds on these and
//! directives store them, nothing else in the compiler executes anything

/// The type tag a literal carries next to its source text
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum NativeType {
    String,
    Int,
    Float,
    Bool,
    Null,
}
impl std::fmt::Display for NativeType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use NativeType::*;
        let s = match self {
            String => "string",
            Int => "int",
            Float => "float",
            Bool => "bool",
            Null => "null",
        };
        write!(f, "{}", s)
    }
}

#[derive(PartialEq, Clone, Debug)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Value {
    pub fn native_type(&self) -> NativeType {
        match self {
            Value::String(_) => NativeType::String,
            Value::Int(_) => NativeType::Int,
            Value::Float(_) => NativeType::Float,
            Value::Bool(_) => NativeType::Bool,
            Value::Null => NativeType::Null,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Truthiness the way the host runtime sees it: "", "0", 0, 0.0, false
    /// and null are all false
    pub fn truthy(&self) -> bool {
        match self {
            Value::String(s) => !(s.is_empty() || s == "0"),
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Bool(b) => *b,
            Value::Null => false,
        }
    }

    /// What the host runtime prints when echoing this value
    pub fn output_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => float_string(*f),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) | Value::Null => String::new(),
        }
    }

    /// Converts to another native type, the same loose way the host would
    pub fn cast(&self, to: NativeType) -> Value {
        match to {
            NativeType::String => Value::String(self.output_string()),
            NativeType::Bool => Value::Bool(self.truthy()),
            NativeType::Null => Value::Null,
            NativeType::Int => Value::Int(match self {
                Value::String(s) => leading_number(s) as i64,
                Value::Int(i) => *i,
                Value::Float(f) => *f as i64,
                Value::Bool(b) => *b as i64,
                Value::Null => 0,
            }),
            NativeType::Float => Value::Float(match self {
                Value::String(s) => leading_number(s),
                Value::Int(i) => *i as f64,
                Value::Float(f) => *f,
                Value::Bool(b) => *b as i64 as f64,
                Value::Null => 0.0,
            }),
        }
    }
}

/// Significant digits the host prints a float with
const FLOAT_PRECISION: usize = 14;

/// 0.1 + 0.2 => "0.3", 1e20 => "1.0E+20", 1e-5 => "1.0E-5"
fn float_string(f: f64) -> String {
    if f.is_nan() {
        return "NAN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    if f == 0.0 {
        return if f.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    // rounding to the precision first decides which form we get
    let scientific = format!("{:.*e}", FLOAT_PRECISION - 1, f);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => return scientific,
    };
    if exponent < -4 || exponent >= FLOAT_PRECISION as i32 {
        let mut mantissa = trim_fraction(mantissa).to_string();
        if !mantissa.contains('.') {
            mantissa.push_str(".0");
        }
        return format!("{}E{}{}", mantissa, if exponent < 0 { '-' } else { '+' }, exponent.abs());
    }
    let decimals = (FLOAT_PRECISION as i32 - 1 - exponent).max(0) as usize;
    trim_fraction(&format!("{:.*}", decimals, f)).to_string()
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// "12abc" => 12, "abc" => 0
fn leading_number(s: &str) -> f64 {
    let s = s.trim_start();
    let mut end = 0;
    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() || c == '.' || (i == 0 && c == '-') {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    s[..end].parse().unwrap_or(0.0)
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
            other => write!(f, "{}", other.output_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn truthiness() {
        assert!(!Value::String("0".to_string()).truthy());
        assert!(!Value::String(String::new()).truthy());
        assert!(Value::String("00".to_string()).truthy());
        assert!(!Value::Int(0).truthy());
        assert!(!Value::Float(0.0).truthy());
        assert!(Value::Float(0.5).truthy());
        assert!(!Value::Null.truthy());
    }
    #[test]
    fn casts() {
        assert_eq!(Value::String("12abc".to_string()).cast(NativeType::Int), Value::Int(12));
        assert_eq!(Value::String("abc".to_string()).cast(NativeType::Int), Value::Int(0));
        assert_eq!(Value::Int(0).cast(NativeType::Bool), Value::Bool(false));
        assert_eq!(Value::Bool(true).cast(NativeType::String), Value::String("1".to_string()));
        assert_eq!(Value::Int(3).cast(NativeType::Float), Value::Float(3.0));
        assert_eq!(Value::Float(2.5).cast(NativeType::String), Value::String("2.5".to_string()));
    }
    #[test]
    fn floats_print_like_the_host() {
        let out = |f: f64| Value::Float(f).output_string();
        assert_eq!(out(0.1 + 0.2), "0.3");
        assert_eq!(out(3.0), "3");
        assert_eq!(out(-1.5), "-1.5");
        assert_eq!(out(1.0 / 3.0), "0.33333333333333");
        assert_eq!(out(0.0001), "0.0001");
        assert_eq!(out(0.00001), "1.0E-5");
        assert_eq!(out(1e13), "10000000000000");
        assert_eq!(out(1e14), "1.0E+14");
        assert_eq!(out(1e20), "1.0E+20");
        assert_eq!(out(-2.5e-7), "-2.5E-7");
        assert_eq!(out(9.999999999999999), "10");
        assert_eq!(out(f64::INFINITY), "INF");
        assert_eq!(out(f64::NAN), "NAN");
    }
}

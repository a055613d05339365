//! Physical units for table columns
//!
//! A small SI-based unit system: base and derived units, decimal prefixes
//! (symbol and long form) and compound expressions such as `kg m^2 s^-2`,
//! `m/s` or `W/(m^2*K)`. The registry answers a single capability query,
//! [`UnitRegistry::lookup`], and the annotator degrades anything it cannot
//! resolve to dimensionless with a diagnostic.

use crate::constants::DIMENSIONLESS;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::models::ColumnDefinition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Exponents of base quantities, keyed by quantity name
pub type Dimension = BTreeMap<String, i32>;

const BASE_QUANTITIES: [&str; 7] = [
    "length",
    "mass",
    "time",
    "current",
    "temperature",
    "substance",
    "luminosity",
];

/// A resolved physical unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalUnit {
    /// Unit text as written in the column definition
    pub symbol: String,
    /// Scale to the coherent SI unit of the same dimension
    pub factor: f64,
    pub dimension: Dimension,
}

impl PhysicalUnit {
    /// Multiplier converting a magnitude in `self` into `other`
    pub fn conversion_factor(&self, other: &PhysicalUnit) -> Option<f64> {
        if self.dimension == other.dimension {
            Some(self.factor / other.factor)
        } else {
            None
        }
    }

    pub fn is_compatible(&self, other: &PhysicalUnit) -> bool {
        self.dimension == other.dimension
    }
}

/// Unit attached to a column or cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Unit {
    Dimensionless,
    Physical(PhysicalUnit),
}

impl Unit {
    pub fn symbol(&self) -> &str {
        match self {
            Unit::Dimensionless => DIMENSIONLESS,
            Unit::Physical(unit) => &unit.symbol,
        }
    }

    pub fn is_dimensionless(&self) -> bool {
        matches!(self, Unit::Dimensionless)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

struct UnitDef {
    symbols: &'static [&'static str],
    names: &'static [&'static str],
    factor: f64,
    /// length, mass, time, current, temperature, substance, luminosity
    dims: [i32; 7],
    prefixable: bool,
}

const fn unit(
    symbols: &'static [&'static str],
    names: &'static [&'static str],
    factor: f64,
    dims: [i32; 7],
    prefixable: bool,
) -> UnitDef {
    UnitDef {
        symbols,
        names,
        factor,
        dims,
        prefixable,
    }
}

#[rustfmt::skip]
const UNITS: &[UnitDef] = &[
    // SI base units (gram instead of kilogram so prefixes compose)
    unit(&["m"], &["meter", "metre"], 1.0, [1, 0, 0, 0, 0, 0, 0], true),
    unit(&["g"], &["gram"], 1e-3, [0, 1, 0, 0, 0, 0, 0], true),
    unit(&["s"], &["second"], 1.0, [0, 0, 1, 0, 0, 0, 0], true),
    unit(&["A"], &["ampere", "amp"], 1.0, [0, 0, 0, 1, 0, 0, 0], true),
    unit(&["K"], &["kelvin"], 1.0, [0, 0, 0, 0, 1, 0, 0], true),
    unit(&["mol"], &["mole"], 1.0, [0, 0, 0, 0, 0, 1, 0], true),
    unit(&["cd"], &["candela"], 1.0, [0, 0, 0, 0, 0, 0, 1], true),
    // Derived units
    unit(&["Hz"], &["hertz"], 1.0, [0, 0, -1, 0, 0, 0, 0], true),
    unit(&["N"], &["newton"], 1.0, [1, 1, -2, 0, 0, 0, 0], true),
    unit(&["Pa"], &["pascal"], 1.0, [-1, 1, -2, 0, 0, 0, 0], true),
    unit(&["J"], &["joule"], 1.0, [2, 1, -2, 0, 0, 0, 0], true),
    unit(&["W"], &["watt"], 1.0, [2, 1, -3, 0, 0, 0, 0], true),
    unit(&["C"], &["coulomb"], 1.0, [0, 0, 1, 1, 0, 0, 0], true),
    unit(&["V"], &["volt"], 1.0, [2, 1, -3, -1, 0, 0, 0], true),
    unit(&["F"], &["farad"], 1.0, [-2, -1, 4, 2, 0, 0, 0], true),
    unit(&["Ω", "ohm", "Ohm"], &[], 1.0, [2, 1, -3, -2, 0, 0, 0], true),
    unit(&["S"], &["siemens"], 1.0, [-2, -1, 3, 2, 0, 0, 0], true),
    unit(&["Wb"], &["weber"], 1.0, [2, 1, -2, -1, 0, 0, 0], true),
    unit(&["T"], &["tesla"], 1.0, [0, 1, -2, -1, 0, 0, 0], true),
    unit(&["H"], &["henry"], 1.0, [2, 1, -2, -2, 0, 0, 0], true),
    unit(&["lm"], &["lumen"], 1.0, [0, 0, 0, 0, 0, 0, 1], true),
    unit(&["lx"], &["lux"], 1.0, [-2, 0, 0, 0, 0, 0, 1], true),
    unit(&["Bq"], &["becquerel"], 1.0, [0, 0, -1, 0, 0, 0, 0], true),
    unit(&["Gy"], &["gray"], 1.0, [2, 0, -2, 0, 0, 0, 0], true),
    unit(&["Sv"], &["sievert"], 1.0, [2, 0, -2, 0, 0, 0, 0], true),
    unit(&["kat"], &["katal"], 1.0, [0, 0, -1, 0, 0, 1, 0], true),
    unit(&["rad"], &["radian"], 1.0, [0; 7], true),
    unit(&["sr"], &["steradian"], 1.0, [0; 7], false),
    // Accepted non-SI units
    unit(&["L", "l"], &["liter", "litre"], 1e-3, [3, 0, 0, 0, 0, 0, 0], true),
    unit(&["min"], &["minute"], 60.0, [0, 0, 1, 0, 0, 0, 0], false),
    unit(&["h"], &["hour"], 3600.0, [0, 0, 1, 0, 0, 0, 0], false),
    unit(&["d"], &["day"], 86400.0, [0, 0, 1, 0, 0, 0, 0], false),
    unit(&["t"], &["tonne"], 1e3, [0, 1, 0, 0, 0, 0, 0], false),
    unit(&["eV"], &["electronvolt"], 1.602_176_634e-19, [2, 1, -2, 0, 0, 0, 0], true),
    unit(&["bar"], &[], 1e5, [-1, 1, -2, 0, 0, 0, 0], true),
    unit(&["atm"], &["atmosphere"], 101_325.0, [-1, 1, -2, 0, 0, 0, 0], false),
    unit(&["Torr"], &["torr"], 101_325.0 / 760.0, [-1, 1, -2, 0, 0, 0, 0], false),
    unit(&["Å"], &["angstrom"], 1e-10, [1, 0, 0, 0, 0, 0, 0], false),
    unit(&["degC", "°C"], &["celsius", "degree_Celsius"], 1.0, [0, 0, 0, 0, 1, 0, 0], false),
    unit(&["deg", "°"], &["degree"], std::f64::consts::PI / 180.0, [0; 7], false),
    unit(&["%"], &["percent"], 1e-2, [0; 7], false),
    unit(&["ppm"], &[], 1e-6, [0; 7], false),
    unit(&["in"], &["inch"], 0.0254, [1, 0, 0, 0, 0, 0, 0], false),
    unit(&["ft"], &["foot", "feet"], 0.3048, [1, 0, 0, 0, 0, 0, 0], false),
];

const SYMBOL_PREFIXES: &[(&str, f64)] = &[
    ("Y", 1e24),
    ("Z", 1e21),
    ("E", 1e18),
    ("P", 1e15),
    ("T", 1e12),
    ("G", 1e9),
    ("M", 1e6),
    ("k", 1e3),
    ("h", 1e2),
    ("da", 1e1),
    ("d", 1e-1),
    ("c", 1e-2),
    ("m", 1e-3),
    ("µ", 1e-6),
    ("μ", 1e-6),
    ("u", 1e-6),
    ("n", 1e-9),
    ("p", 1e-12),
    ("f", 1e-15),
    ("a", 1e-18),
    ("z", 1e-21),
    ("y", 1e-24),
];

const NAME_PREFIXES: &[(&str, f64)] = &[
    ("yotta", 1e24),
    ("zetta", 1e21),
    ("exa", 1e18),
    ("peta", 1e15),
    ("tera", 1e12),
    ("giga", 1e9),
    ("mega", 1e6),
    ("kilo", 1e3),
    ("hecto", 1e2),
    ("deca", 1e1),
    ("deci", 1e-1),
    ("centi", 1e-2),
    ("milli", 1e-3),
    ("micro", 1e-6),
    ("nano", 1e-9),
    ("pico", 1e-12),
    ("femto", 1e-15),
    ("atto", 1e-18),
];

/// Magnitude and dimension accumulated while evaluating an expression
#[derive(Debug, Clone, PartialEq)]
struct Product {
    factor: f64,
    dimension: Dimension,
}

impl Product {
    fn scalar(factor: f64) -> Self {
        Self {
            factor,
            dimension: Dimension::new(),
        }
    }

    fn from_def(def: &UnitDef, prefix: f64) -> Self {
        let dimension = BASE_QUANTITIES
            .iter()
            .zip(def.dims.iter())
            .filter(|(_, exp)| **exp != 0)
            .map(|(name, exp)| (name.to_string(), *exp))
            .collect();
        Self {
            factor: def.factor * prefix,
            dimension,
        }
    }

    /// `None` when an exponent leaves the `i32` range
    fn combine(mut self, other: Product, sign: i32) -> Option<Self> {
        if sign > 0 {
            self.factor *= other.factor;
        } else {
            self.factor /= other.factor;
        }
        for (name, exp) in other.dimension {
            let entry = self.dimension.entry(name).or_insert(0);
            *entry = entry.checked_add(exp.checked_mul(sign)?)?;
        }
        self.dimension.retain(|_, exp| *exp != 0);
        Some(self)
    }

    fn powi(mut self, exponent: i32) -> Option<Self> {
        self.factor = self.factor.powi(exponent);
        for exp in self.dimension.values_mut() {
            *exp = exp.checked_mul(exponent)?;
        }
        self.dimension.retain(|_, exp| *exp != 0);
        Some(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Atom(String),
    Number(f64),
    Mul,
    Div,
    Pow,
    LParen,
    RParen,
}

fn is_atom_char(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '_' | '%' | '°' | 'µ' | 'μ' | 'Ω' | 'Å')
}

fn tokenize(text: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '*' {
            chars.next();
            if chars.peek() == Some(&'*') {
                chars.next();
                tokens.push(Token::Pow);
            } else {
                tokens.push(Token::Mul);
            }
        } else if c == '·' || c == '⋅' {
            chars.next();
            tokens.push(Token::Mul);
        } else if c == '^' {
            chars.next();
            tokens.push(Token::Pow);
        } else if c == '/' {
            chars.next();
            tokens.push(Token::Div);
        } else if c == '(' {
            chars.next();
            tokens.push(Token::LParen);
        } else if c == ')' {
            chars.next();
            tokens.push(Token::RParen);
        } else if c.is_ascii_digit()
            || c == '.'
            || ((c == '-' || c == '+') && tokens.last() == Some(&Token::Pow))
        {
            let mut number = String::new();
            number.push(c);
            chars.next();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() || d == '.' {
                    number.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Number(number.parse().ok()?));
        } else if is_atom_char(c) {
            let mut atom = String::new();
            while let Some(&d) = chars.peek() {
                if is_atom_char(d) {
                    atom.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Atom(atom));
        } else {
            return None;
        }
    }

    Some(tokens)
}

/// Registry of known units, answering whether a unit text is recognised
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    custom: Vec<String>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that also accepts the given symbols as independent base units
    pub fn with_custom_units<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            custom: symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve a unit text; `None` when the unit system does not know it
    pub fn lookup(&self, text: &str) -> Option<Unit> {
        let text = text.trim();
        if text.is_empty() || text == DIMENSIONLESS {
            return Some(Unit::Dimensionless);
        }

        let tokens = tokenize(text)?;
        let mut parser = ExpressionParser {
            registry: self,
            tokens: &tokens,
            pos: 0,
        };
        let product = parser.expression()?;
        if parser.pos != tokens.len() {
            return None;
        }

        Some(Unit::Physical(PhysicalUnit {
            symbol: text.to_string(),
            factor: product.factor,
            dimension: product.dimension,
        }))
    }

    pub fn is_recognized(&self, text: &str) -> bool {
        self.lookup(text).is_some()
    }

    fn atom(&self, atom: &str) -> Option<Product> {
        if self.custom.iter().any(|c| c == atom) {
            let mut dimension = Dimension::new();
            dimension.insert(atom.to_string(), 1);
            return Some(Product {
                factor: 1.0,
                dimension,
            });
        }

        // Exact matches win over prefixed readings ("min", "Pa", "cd")
        for def in UNITS {
            if def.symbols.contains(&atom) || def.names.contains(&atom) {
                return Some(Product::from_def(def, 1.0));
            }
        }

        for (prefix, scale) in SYMBOL_PREFIXES {
            if let Some(rest) = atom.strip_prefix(prefix) {
                if let Some(def) = UNITS
                    .iter()
                    .find(|d| d.prefixable && d.symbols.contains(&rest))
                {
                    return Some(Product::from_def(def, *scale));
                }
            }
        }

        for (prefix, scale) in NAME_PREFIXES {
            if let Some(rest) = atom.strip_prefix(prefix) {
                if let Some(def) = UNITS.iter().find(|d| d.prefixable && d.names.contains(&rest)) {
                    return Some(Product::from_def(def, *scale));
                }
            }
        }

        None
    }
}

struct ExpressionParser<'a> {
    registry: &'a UnitRegistry,
    tokens: &'a [Token],
    pos: usize,
}

impl ExpressionParser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn expression(&mut self) -> Option<Product> {
        let mut product = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Mul) => {
                    self.pos += 1;
                    product = product.combine(self.term()?, 1)?;
                }
                Some(Token::Div) => {
                    self.pos += 1;
                    product = product.combine(self.term()?, -1)?;
                }
                // Juxtaposition multiplies: "kg m"
                Some(Token::Atom(_)) | Some(Token::Number(_)) | Some(Token::LParen) => {
                    product = product.combine(self.term()?, 1)?;
                }
                _ => return Some(product),
            }
        }
    }

    fn term(&mut self) -> Option<Product> {
        let base = self.factor()?;
        if self.peek() == Some(&Token::Pow) {
            self.pos += 1;
            match self.peek() {
                Some(Token::Number(exp))
                    if exp.fract() == 0.0
                        && *exp >= f64::from(i32::MIN)
                        && *exp <= f64::from(i32::MAX) =>
                {
                    let exp = *exp as i32;
                    self.pos += 1;
                    return base.powi(exp);
                }
                _ => return None,
            }
        }
        Some(base)
    }

    fn factor(&mut self) -> Option<Product> {
        let token = self.peek()?.clone();
        self.pos += 1;
        match token {
            Token::Atom(atom) => self.registry.atom(&atom),
            Token::Number(value) => Some(Product::scalar(value)),
            Token::LParen => {
                let inner = self.expression()?;
                if self.peek() == Some(&Token::RParen) {
                    self.pos += 1;
                    Some(inner)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// Attach a unit to a column from its definition
///
/// Columns without a bracketed unit are dimensionless. Unit text the registry
/// does not know degrades to dimensionless and records a diagnostic.
pub fn annotate_column(
    definition: &ColumnDefinition,
    registry: &UnitRegistry,
    diagnostics: &mut Diagnostics,
    section: &str,
) -> Unit {
    let Some(text) = definition.unit_text() else {
        return Unit::Dimensionless;
    };

    match registry.lookup(text) {
        Some(unit) => {
            debug!("Column '{}' annotated with unit '{}'", definition.label, unit);
            unit
        }
        None => {
            diagnostics.push_for_section(
                DiagnosticKind::UnrecognizedUnit,
                section,
                format!(
                    "{} not recognised as a unit of column '{}', using dimensionless instead",
                    text, definition.label
                ),
            );
            Unit::Dimensionless
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physical(registry: &UnitRegistry, text: &str) -> PhysicalUnit {
        match registry.lookup(text) {
            Some(Unit::Physical(unit)) => unit,
            other => panic!("expected physical unit for '{}', got {:?}", text, other),
        }
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_base_units() {
        let registry = UnitRegistry::new();
        let metre = physical(&registry, "m");
        assert_eq!(metre.symbol, "m");
        assert_eq!(metre.factor, 1.0);
        assert_eq!(metre.dimension.get("length"), Some(&1));

        let kilogram = physical(&registry, "kg");
        assert!(approx_eq(kilogram.factor, 1.0));
        assert_eq!(kilogram.dimension.get("mass"), Some(&1));
    }

    #[test]
    fn test_exact_match_beats_prefix() {
        let registry = UnitRegistry::new();
        // "min" is minutes, not milli-inch
        let minute = physical(&registry, "min");
        assert_eq!(minute.factor, 60.0);
        // "cd" is candela, not centi-day
        let candela = physical(&registry, "cd");
        assert_eq!(candela.dimension.get("luminosity"), Some(&1));
    }

    #[test]
    fn test_prefixed_units() {
        let registry = UnitRegistry::new();
        assert!(approx_eq(physical(&registry, "mm").factor, 1e-3));
        assert!(approx_eq(physical(&registry, "µs").factor, 1e-6));
        assert!(approx_eq(physical(&registry, "kilometer").factor, 1e3));
        assert!(approx_eq(physical(&registry, "mbar").factor, 100.0));
        assert!(approx_eq(physical(&registry, "GHz").factor, 1e9));
    }

    #[test]
    fn test_compound_expressions() {
        let registry = UnitRegistry::new();

        let velocity = physical(&registry, "m/s");
        assert_eq!(velocity.dimension.get("length"), Some(&1));
        assert_eq!(velocity.dimension.get("time"), Some(&-1));

        let energy = physical(&registry, "kg m^2 s^-2");
        let joule = physical(&registry, "J");
        assert_eq!(energy.dimension, joule.dimension);
        assert!(approx_eq(energy.factor, 1.0));

        let conductance = physical(&registry, "W/(m**2*K)");
        assert_eq!(conductance.dimension.get("mass"), Some(&1));
        assert_eq!(conductance.dimension.get("time"), Some(&-3));
        assert_eq!(conductance.dimension.get("temperature"), Some(&-1));
        assert_eq!(conductance.dimension.get("length"), None);
    }

    #[test]
    fn test_dimensionless_text() {
        let registry = UnitRegistry::new();
        assert_eq!(registry.lookup(""), Some(Unit::Dimensionless));
        assert_eq!(registry.lookup("dimensionless"), Some(Unit::Dimensionless));
    }

    #[test]
    fn test_unrecognized_units() {
        let registry = UnitRegistry::new();
        assert!(registry.lookup("furlongs").is_none());
        assert!(registry.lookup("m^").is_none());
        assert!(registry.lookup("(m").is_none());
        assert!(registry.lookup("m $").is_none());
    }

    #[test]
    fn test_exponent_overflow_is_unrecognized() {
        let registry = UnitRegistry::new();
        assert!(registry.lookup("m^2147483647 m").is_none());
        assert!(registry.lookup("m^-2147483648 / m").is_none());
        assert!(registry.lookup("(m^65536)^65536").is_none());
        assert!(registry.lookup("m^3000000000").is_none());
        assert_eq!(physical(&registry, "m^2147483647").dimension.get("length"), Some(&i32::MAX));
    }

    #[test]
    fn test_custom_units() {
        let registry = UnitRegistry::with_custom_units(["counts"]);
        let counts = physical(&registry, "counts/s");
        assert_eq!(counts.dimension.get("counts"), Some(&1));
        assert!(UnitRegistry::new().lookup("counts").is_none());
    }

    #[test]
    fn test_conversion_factor() {
        let registry = UnitRegistry::new();
        let km = physical(&registry, "km");
        let m = physical(&registry, "m");
        let s = physical(&registry, "s");
        assert!(approx_eq(km.conversion_factor(&m).unwrap(), 1000.0));
        assert!(km.conversion_factor(&s).is_none());
        assert!(physical(&registry, "mL").is_compatible(&physical(&registry, "cm^3")));
    }

    #[test]
    fn test_annotate_column() {
        let registry = UnitRegistry::new();
        let mut diagnostics = Diagnostics::new();

        let length = ColumnDefinition::new("Length", "l [m]");
        let unit = annotate_column(&length, &registry, &mut diagnostics, "*data definitions");
        assert_eq!(unit.symbol(), "m");

        let count = ColumnDefinition::new("Count", "n");
        let unit = annotate_column(&count, &registry, &mut diagnostics, "*data definitions");
        assert!(unit.is_dimensionless());
        assert!(diagnostics.is_empty());

        let odd = ColumnDefinition::new("Odd", "x [furlong]");
        let unit = annotate_column(&odd, &registry, &mut diagnostics, "*data definitions");
        assert!(unit.is_dimensionless());
        assert!(diagnostics.has_kind(DiagnosticKind::UnrecognizedUnit));
        assert!(diagnostics.mentions("furlong"));
    }
}

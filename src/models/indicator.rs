//! Indicator specifications and the instances the registry owns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::analysis::{self, IndicatorError};
use crate::config::INDICATORS;
use crate::domain::Point;
use crate::error::ChartError;
use crate::render::{OverlayOptions, OverlayStyle, SeriesHandle};

/// Opaque id handed out by the registry. Ids grow monotonically, so ordering
/// by id is insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndicatorId(u64);

impl IndicatorId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ind-{}", self.0)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
    #[strum(to_string = "BOLLINGER", serialize = "BB")]
    Bollinger,
}

/// Output lines computed from a price snapshot, tail-aligned.
type ComputeFn = fn(&IndicatorParams, &[f64]) -> Result<Vec<Vec<f64>>, IndicatorError>;

impl IndicatorKind {
    /// Number of overlays (output lines) an instance of this kind draws.
    pub fn line_count(self) -> usize {
        match self {
            IndicatorKind::Sma | IndicatorKind::Ema | IndicatorKind::Rsi => 1,
            IndicatorKind::Macd | IndicatorKind::Bollinger => 3,
        }
    }

    pub fn default_params(self) -> IndicatorParams {
        let p = &INDICATORS.params;
        match self {
            IndicatorKind::Sma => IndicatorParams::Period(p.sma_period),
            IndicatorKind::Ema => IndicatorParams::Period(p.ema_period),
            IndicatorKind::Rsi => IndicatorParams::Period(p.rsi_period),
            IndicatorKind::Macd => IndicatorParams::Macd {
                fast: p.macd_fast,
                slow: p.macd_slow,
                signal: p.macd_signal,
            },
            IndicatorKind::Bollinger => IndicatorParams::Bands {
                period: p.bollinger_period,
                std_dev: p.bollinger_std_dev,
            },
        }
    }

    fn default_colors(self) -> &'static [&'static str] {
        let c = &INDICATORS.colors;
        match self {
            IndicatorKind::Sma => c.sma,
            IndicatorKind::Ema => c.ema,
            IndicatorKind::Rsi => c.rsi,
            IndicatorKind::Macd => c.macd,
            IndicatorKind::Bollinger => c.bollinger,
        }
    }

    fn compute_fn(self) -> ComputeFn {
        match self {
            IndicatorKind::Sma => compute_sma,
            IndicatorKind::Ema => compute_ema,
            IndicatorKind::Rsi => compute_rsi,
            IndicatorKind::Macd => compute_macd,
            IndicatorKind::Bollinger => compute_bollinger,
        }
    }
}

fn expect_period(params: &IndicatorParams) -> Result<usize, IndicatorError> {
    match params {
        IndicatorParams::Period(period) => Ok(*period),
        other => Err(IndicatorError::invalid_input(format!(
            "expected a single period, got {other:?}"
        ))),
    }
}

fn compute_sma(params: &IndicatorParams, closes: &[f64]) -> Result<Vec<Vec<f64>>, IndicatorError> {
    Ok(vec![analysis::sma(closes, expect_period(params)?)?])
}

fn compute_ema(params: &IndicatorParams, closes: &[f64]) -> Result<Vec<Vec<f64>>, IndicatorError> {
    Ok(vec![analysis::ema(closes, expect_period(params)?)?])
}

fn compute_rsi(params: &IndicatorParams, closes: &[f64]) -> Result<Vec<Vec<f64>>, IndicatorError> {
    Ok(vec![analysis::rsi(closes, expect_period(params)?)?])
}

fn compute_macd(params: &IndicatorParams, closes: &[f64]) -> Result<Vec<Vec<f64>>, IndicatorError> {
    let IndicatorParams::Macd { fast, slow, signal } = *params else {
        return Err(IndicatorError::invalid_input(format!(
            "MACD requires fast/slow/signal periods, got {params:?}"
        )));
    };
    let out = analysis::macd(closes, fast, slow, signal)?;
    Ok(vec![out.macd, out.signal, out.histogram])
}

fn compute_bollinger(
    params: &IndicatorParams,
    closes: &[f64],
) -> Result<Vec<Vec<f64>>, IndicatorError> {
    let IndicatorParams::Bands { period, std_dev } = *params else {
        return Err(IndicatorError::invalid_input(format!(
            "Bollinger Bands require period and standard deviation, got {params:?}"
        )));
    };
    let bands = analysis::bollinger_bands(closes, period, std_dev)?;
    Ok(vec![bands.upper, bands.middle, bands.lower])
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IndicatorParams {
    Period(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bands {
        period: usize,
        std_dev: f64,
    },
}

impl IndicatorParams {
    fn fits(&self, kind: IndicatorKind) -> bool {
        matches!(
            (kind, self),
            (
                IndicatorKind::Sma | IndicatorKind::Ema | IndicatorKind::Rsi,
                IndicatorParams::Period(_)
            ) | (IndicatorKind::Macd, IndicatorParams::Macd { .. })
                | (IndicatorKind::Bollinger, IndicatorParams::Bands { .. })
        )
    }
}

/// Presentation and styling of one output line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    pub label: String,
    pub color: String,
    pub precision: usize,
    pub options: OverlayOptions,
}

/// What to compute and how to colour it. Immutable once handed to the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub kind: IndicatorKind,
    pub params: IndicatorParams,
    /// One colour per output line; missing entries fall back to the defaults.
    pub colors: Vec<String>,
}

impl IndicatorSpec {
    pub fn new(kind: IndicatorKind, params: IndicatorParams) -> Self {
        Self {
            kind,
            params,
            colors: Vec::new(),
        }
    }

    pub fn with_defaults(kind: IndicatorKind) -> Self {
        Self::new(kind, kind.default_params())
    }

    pub fn sma(period: usize) -> Self {
        Self::new(IndicatorKind::Sma, IndicatorParams::Period(period))
    }

    pub fn ema(period: usize) -> Self {
        Self::new(IndicatorKind::Ema, IndicatorParams::Period(period))
    }

    pub fn rsi(period: usize) -> Self {
        Self::new(IndicatorKind::Rsi, IndicatorParams::Period(period))
    }

    pub fn macd(fast: usize, slow: usize, signal: usize) -> Self {
        Self::new(IndicatorKind::Macd, IndicatorParams::Macd { fast, slow, signal })
    }

    pub fn bollinger(period: usize, std_dev: f64) -> Self {
        Self::new(IndicatorKind::Bollinger, IndicatorParams::Bands { period, std_dev })
    }

    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Rejects params whose shape does not belong to `kind`. Period values
    /// themselves are checked by the math functions.
    pub fn validate(&self) -> Result<(), ChartError> {
        if !self.params.fits(self.kind) {
            return Err(ChartError::InvalidInput(format!(
                "{:?} are not valid parameters for {}",
                self.params, self.kind
            )));
        }
        if self.colors.len() > self.kind.line_count() {
            return Err(ChartError::InvalidInput(format!(
                "{} draws {} line(s) but {} colours were assigned",
                self.kind,
                self.kind.line_count(),
                self.colors.len()
            )));
        }
        Ok(())
    }

    /// Runs the math for this kind over `closes`.
    pub fn compute(&self, closes: &[f64]) -> Result<Vec<Vec<f64>>, IndicatorError> {
        (self.kind.compute_fn())(&self.params, closes)
    }

    fn color(&self, line: usize) -> String {
        self.colors
            .get(line)
            .cloned()
            .or_else(|| self.kind.default_colors().get(line).map(|c| c.to_string()))
            .unwrap_or_default()
    }

    /// Label, colour and overlay options for each output line, in output order.
    pub fn line_specs(&self) -> Vec<LineSpec> {
        let style = &INDICATORS.style;
        let precision = &INDICATORS.precision;

        let lines: Vec<(String, u32, Option<&'static str>, OverlayStyle, usize)> =
            match (self.kind, self.params) {
                (IndicatorKind::Macd, IndicatorParams::Macd { fast, slow, signal }) => {
                    let scale = Some(style.macd_price_scale);
                    vec![
                        (
                            format!("MACD({fast},{slow},{signal})"),
                            style.band_line_width,
                            scale,
                            OverlayStyle::Line,
                            precision.macd,
                        ),
                        (
                            format!("Signal({signal})"),
                            style.band_line_width,
                            scale,
                            OverlayStyle::Line,
                            precision.macd,
                        ),
                        (
                            "Histogram".to_string(),
                            style.band_line_width,
                            scale,
                            OverlayStyle::Histogram,
                            precision.macd,
                        ),
                    ]
                }
                (IndicatorKind::Bollinger, IndicatorParams::Bands { period, .. }) => {
                    ["Upper", "Middle", "Lower"]
                        .iter()
                        .map(|band| {
                            (
                                format!("BB {band}({period})"),
                                style.band_line_width,
                                None,
                                OverlayStyle::Line,
                                precision.price,
                            )
                        })
                        .collect()
                }
                (kind, params) => {
                    let period = match params {
                        IndicatorParams::Period(p) => p,
                        _ => 0,
                    };
                    let scale = (kind == IndicatorKind::Rsi).then_some(style.rsi_price_scale);
                    vec![(
                        format!("{kind}({period})"),
                        style.average_line_width,
                        scale,
                        OverlayStyle::Line,
                        precision.price,
                    )]
                }
            };

        lines
            .into_iter()
            .enumerate()
            .map(|(i, (label, line_width, scale, overlay_style, precision))| {
                let color = self.color(i);
                LineSpec {
                    options: OverlayOptions {
                        title: label.clone(),
                        color: color.clone(),
                        line_width,
                        price_scale_id: scale.map(str::to_string),
                        style: overlay_style,
                    },
                    label,
                    color,
                    precision,
                }
            })
            .collect()
    }
}

impl fmt::Display for IndicatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.params {
            IndicatorParams::Period(p) => write!(f, "{}({p})", self.kind),
            IndicatorParams::Macd { fast, slow, signal } => {
                write!(f, "{}({fast},{slow},{signal})", self.kind)
            }
            IndicatorParams::Bands { period, std_dev } => {
                write!(f, "{}({period},{std_dev})", self.kind)
            }
        }
    }
}

/// The one-click indicator buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Preset {
    Sma20,
    Sma50,
    Ema12,
    Rsi14,
    #[strum(to_string = "bollinger", serialize = "bb")]
    Bollinger,
}

impl Preset {
    pub fn spec(self) -> IndicatorSpec {
        match self {
            Preset::Sma20 => IndicatorSpec::sma(20).with_colors(["#FF6B6B"]),
            Preset::Sma50 => IndicatorSpec::sma(50).with_colors(["#4ECDC4"]),
            Preset::Ema12 => IndicatorSpec::ema(12).with_colors(["#9B59B6"]),
            Preset::Rsi14 => IndicatorSpec::rsi(14).with_colors(["#E67E22"]),
            Preset::Bollinger => {
                IndicatorSpec::bollinger(20, 2.0).with_colors(["#E74C3C", "#F39C12", "#27AE60"])
            }
        }
    }
}

impl FromStr for IndicatorSpec {
    type Err = ChartError;

    /// Accepts a preset name (`sma20`, `bollinger`, ...) or
    /// `KIND[:p1[:p2[:p3]]]` such as `SMA:50`, `MACD:12:26:9`, `BB:20:2.5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(preset) = Preset::from_str(s) {
            return Ok(preset.spec());
        }

        let mut parts = s.split(':');
        let kind_str = parts.next().unwrap_or_default();
        let kind = IndicatorKind::from_str(kind_str)
            .map_err(|_| ChartError::InvalidInput(format!("unknown indicator `{kind_str}`")))?;
        let args: Vec<&str> = parts.collect();

        let parse_usize = |raw: &str| {
            raw.parse::<usize>()
                .map_err(|e| ChartError::InvalidInput(format!("bad period `{raw}`: {e}")))
        };

        let mut params = kind.default_params();
        match &mut params {
            IndicatorParams::Period(period) => {
                if let Some(&raw) = args.first() {
                    *period = parse_usize(raw)?;
                }
            }
            IndicatorParams::Macd { fast, slow, signal } => {
                for (slot, &raw) in [fast, slow, signal].into_iter().zip(&args) {
                    *slot = parse_usize(raw)?;
                }
            }
            IndicatorParams::Bands { period, std_dev } => {
                if let Some(&raw) = args.first() {
                    *period = parse_usize(raw)?;
                }
                if let Some(&raw) = args.get(1) {
                    *std_dev = raw.parse::<f64>().map_err(|e| {
                        ChartError::InvalidInput(format!("bad standard deviation `{raw}`: {e}"))
                    })?;
                }
            }
        }

        if args.len() > params_arity(&params) {
            return Err(ChartError::InvalidInput(format!(
                "too many parameters for {kind}: `{s}`"
            )));
        }

        Ok(IndicatorSpec::new(kind, params))
    }
}

fn params_arity(params: &IndicatorParams) -> usize {
    match params {
        IndicatorParams::Period(_) => 1,
        IndicatorParams::Macd { .. } => 3,
        IndicatorParams::Bands { .. } => 2,
    }
}

/// One drawn output line: its overlay handle and the computed points behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLine {
    pub handle: SeriesHandle,
    pub label: String,
    pub color: String,
    pub precision: usize,
    pub points: Vec<Point>,
}

impl OverlayLine {
    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }
}

/// An active indicator. Never mutated in place; a refresh is remove + re-add.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorInstance {
    pub id: IndicatorId,
    pub spec: IndicatorSpec,
    pub lines: Vec<OverlayLine>,
}

impl IndicatorInstance {
    pub fn handles(&self) -> impl Iterator<Item = SeriesHandle> + '_ {
        self.lines.iter().map(|line| line.handle)
    }

    pub fn line_for(&self, handle: SeriesHandle) -> Option<&OverlayLine> {
        self.lines.iter().find(|line| line.handle == handle)
    }
}

//! Representação de armazenamento (2 casas decimais) e política de arredondamento.

use serde::{Deserialize, Serialize, Serializer};

/// Fator de escala entre o valor decimal e centésimos.
const SCALE: f64 = 100.0;

/// Tolerância absoluta (em centésimos) para ruído de ponto flutuante.
const ABS_TOLERANCE: f64 = 1e-9;

/// Largura máxima do ruído, em ulps, aceita em magnitudes grandes.
const NOISE_ULPS: f64 = 4.0;

/// Valor decimal com exatamente 2 casas, guardado como contagem de centésimos.
///
/// É a representação usada na chave de cache, no armazenamento e nos valores
/// devolvidos ao cliente.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cents(i64);

impl Cents {
    /// Zero.
    pub const ZERO: Cents = Cents(0);

    /// Cria a partir de uma contagem de centésimos.
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// Contagem de centésimos.
    pub const fn hundredths(self) -> i64 {
        self.0
    }

    /// Valor como `f64`.
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / SCALE
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Cents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Política de arredondamento para 2 casas decimais.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Calcula com os operandos crus e arredonda apenas o resultado (meio para longe do zero).
    /// Os operandos são arredondados da mesma forma só para a chave/armazenamento.
    ///
    /// Entradas diferentes que caem na mesma chave podem ter resultados crus
    /// diferentes; o primeiro registro gravado vale para todas elas.
    HalfUp,
    /// Arredonda os operandos para cima (teto) antes do cálculo e o resultado depois.
    ///
    /// O resultado depende só da chave.
    #[default]
    Ceiling,
}

impl RoundingMode {
    /// Indica se os operandos arredondados entram na aritmética.
    pub fn rounds_operands_before_compute(self) -> bool {
        matches!(self, RoundingMode::Ceiling)
    }

    /// Arredonda `value` para centésimos segundo a política.
    ///
    /// Retorna `None` para valores não finitos ou que não cabem em `i64`.
    pub fn round(self, value: f64) -> Option<Cents> {
        if !value.is_finite() {
            return None;
        }

        let scaled = value * SCALE;
        let tolerance = ABS_TOLERANCE.max(scaled.abs() * f64::EPSILON * NOISE_ULPS);

        let rounded = match self {
            RoundingMode::HalfUp => (scaled + scaled.signum() * tolerance).round(),
            RoundingMode::Ceiling => {
                let nearest = scaled.round();
                if (scaled - nearest).abs() <= tolerance {
                    nearest
                } else {
                    scaled.ceil()
                }
            }
        };

        if rounded.abs() >= i64::MAX as f64 {
            return None;
        }

        Some(Cents(rounded as i64))
    }
}

impl std::fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundingMode::HalfUp => write!(f, "half_up"),
            RoundingMode::Ceiling => write!(f, "ceiling"),
        }
    }
}

impl std::str::FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "half_up" | "halfup" | "post" => Ok(RoundingMode::HalfUp),
            "ceiling" | "ceil" | "pre" => Ok(RoundingMode::Ceiling),
            other => Err(format!("unknown rounding mode '{}'", other)),
        }
    }
}

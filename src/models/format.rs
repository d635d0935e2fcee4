// ============================================================================
// Formatage des nombres pour l'affichage
// ============================================================================
// Abréviation par ordre de grandeur : 1234567 -> "1.23M"
//
// CONCEPTS RUST :
// 1. Option<f64> : une valeur absente n'est jamais une erreur
// 2. Fonctions totales : toute entrée (NaN, infini, None) produit une String
// ============================================================================

/// Valeur affichée quand un champ numérique est absent
pub const EMPTY_VALUE: &str = "";

/// Marqueur de devise pour les montants
pub const CURRENCY_PREFIX: &str = "$ ";

/// Suffixes par puissance de 1000
const SUFFIXES: [&str; 7] = ["", "K", "M", "B", "T", "P", "E"];

/// Nombre de décimales conservées
const PRECISION: usize = 2;

/// Abrège un nombre avec un suffixe K/M/B/...
///
/// - arrondi à deux décimales, zéros de fin supprimés ("1.50K" -> "1.5K")
/// - si l'arrondi atteint 1000, on passe au suffixe suivant (999999 -> "1M")
/// - NaN et infini donnent EMPTY_VALUE
///
/// # Exemple
/// assert_eq!(millify(1234567.0), "1.23M");
pub fn millify(value: f64) -> String {
    if !value.is_finite() {
        return EMPTY_VALUE.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let mut scaled = value.abs();
    let mut unit = 0;

    while scaled >= 1000.0 && unit < SUFFIXES.len() - 1 {
        scaled /= 1000.0;
        unit += 1;
    }

    // L'arrondi peut produire "1000.00" : on remonte d'un cran
    let mut rounded = round_to_precision(scaled);
    if rounded >= 1000.0 && unit < SUFFIXES.len() - 1 {
        scaled /= 1000.0;
        unit += 1;
        rounded = round_to_precision(scaled);
    }

    let digits = trim_trailing_zeros(format!("{:.*}", PRECISION, rounded));

    // Évite "-0" pour les très petites valeurs négatives
    if digits == "0" {
        return digits;
    }

    format!("{}{}{}", sign, digits, SUFFIXES[unit])
}

fn round_to_precision(value: f64) -> f64 {
    let factor = 10f64.powi(PRECISION as i32);
    (value * factor).round() / factor
}

fn trim_trailing_zeros(mut digits: String) -> String {
    if digits.contains('.') {
        while digits.ends_with('0') {
            digits.pop();
        }
        if digits.ends_with('.') {
            digits.pop();
        }
    }
    digits
}

/// Montant monétaire : "$ 1.23M", ou EMPTY_VALUE si absent
pub fn format_currency(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{}{}", CURRENCY_PREFIX, millify(v)),
        None => EMPTY_VALUE.to_string(),
    }
}

/// Quantité abrégée sans devise (ex: supply)
pub fn format_abbreviated(value: Option<f64>) -> String {
    value.map(millify).unwrap_or_else(|| EMPTY_VALUE.to_string())
}

/// Entier brut (rang, nombre de marchés, etc.)
pub fn format_count(value: Option<u64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| EMPTY_VALUE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millify_regression_fixture() {
        assert_eq!(millify(1234567.0), "1.23M");
        assert_eq!(format_currency(Some(1234567.0)), "$ 1.23M");
    }

    #[test]
    fn test_millify_small_values() {
        assert_eq!(millify(0.0), "0");
        assert_eq!(millify(999.0), "999");
        assert_eq!(millify(12.3456), "12.35");
        assert_eq!(millify(0.001), "0");
    }

    #[test]
    fn test_millify_suffixes() {
        assert_eq!(millify(1500.0), "1.5K");
        assert_eq!(millify(2_000_000_000.0), "2B");
        assert_eq!(millify(3.25e12), "3.25T");
        assert_eq!(millify(-2500.0), "-2.5K");
    }

    #[test]
    fn test_millify_rounds_up_to_next_suffix() {
        assert_eq!(millify(999_999.0), "1M");
        assert_eq!(millify(999.999), "1K");
    }

    #[test]
    fn test_millify_non_finite() {
        assert_eq!(millify(f64::NAN), EMPTY_VALUE);
        assert_eq!(millify(f64::INFINITY), EMPTY_VALUE);
    }

    #[test]
    fn test_absent_values_are_empty() {
        assert_eq!(format_currency(None), EMPTY_VALUE);
        assert_eq!(format_abbreviated(None), EMPTY_VALUE);
        assert_eq!(format_count(None), EMPTY_VALUE);
        assert_eq!(format_currency(Some(f64::NAN)), EMPTY_VALUE);
    }

    #[test]
    fn test_count_is_not_abbreviated() {
        assert_eq!(format_count(Some(41_234)), "41234");
    }
}

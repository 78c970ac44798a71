//! Mnemonic to glyph mapping used by the substitution engine.
//!
//! The table is fixed at build time and never mutated. Enumeration order matters: the
//! substitution engine walks entries in this order and acts on the first mnemonic whose
//! token occurs anywhere in the buffer, so reordering [`STANDARD_ENTRIES`] changes which
//! edit a buffer with several pending mnemonics receives first.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Every mnemonic/glyph pair, in enumeration order.
///
/// `"1"` leads the list; the remaining keys keep their historical order.
pub const STANDARD_ENTRIES: &[(&str, &str)] = &[
    ("1", "𝟙"),
    ("R", "ℝ"),
    ("Z", "ℤ"),
    ("x", "×"),
    ("times", "×"),
    ("inf", "∞"),
    ("in", "∈"),
    ("sum", "∑"),
    ("had", "∘"),
    ("kro", "⊗"),
    ("dot", "⋅"),
    ("T", "ᵀ"),
    ("^T", "ᵀ"),
    ("par", "∂"),
    ("emp", "∅"),
    ("arr", "→"),
    ("int", "∫"),
    ("dbl", "‖"),
    ("pi", "π"),
    ("sig", "σ"),
    ("rho", "ρ"),
    ("phi", "ϕ"),
    ("theta", "θ"),
    ("alpha", "α"),
    ("beta", "β"),
    ("gamma", "γ"),
    ("delta", "δ"),
    ("epsilon", "ε"),
    ("zeta", "ζ"),
    ("eta", "η"),
    ("iota", "ι"),
    ("kappa", "κ"),
    ("lambda", "λ"),
    ("mu", "μ"),
    ("nu", "ν"),
    ("xi", "ξ"),
    ("omicron", "ο"),
    ("sigma", "σ"),
    ("tau", "τ"),
    ("upsilon", "υ"),
    ("chi", "χ"),
    ("psi", "ψ"),
    ("omega", "ω"),
    ("u0", "₀"),
    ("u1", "₁"),
    ("u2", "₂"),
    ("u3", "₃"),
    ("u4", "₄"),
    ("u5", "₅"),
    ("u6", "₆"),
    ("u7", "₇"),
    ("u8", "₈"),
    ("u9", "₉"),
    ("_0", "₀"),
    ("_1", "₁"),
    ("_2", "₂"),
    ("_3", "₃"),
    ("_4", "₄"),
    ("_5", "₅"),
    ("_6", "₆"),
    ("_7", "₇"),
    ("_8", "₈"),
    ("_9", "₉"),
    ("s0", "⁰"),
    ("s1", "¹"),
    ("s2", "²"),
    ("s3", "³"),
    ("s4", "⁴"),
    ("s5", "⁵"),
    ("s6", "⁶"),
    ("s7", "⁷"),
    ("s8", "⁸"),
    ("s9", "⁹"),
    ("s-1", "⁻¹"),
    ("^-1", "⁻¹"),
    ("^0", "⁰"),
    ("^1", "¹"),
    ("^2", "²"),
    ("^3", "³"),
    ("^4", "⁴"),
    ("^5", "⁵"),
    ("^6", "⁶"),
    ("^7", "⁷"),
    ("^8", "⁸"),
    ("^9", "⁹"),
    ("_a", "ₐ"),
    ("_e", "ₑ"),
    ("_h", "ₕ"),
    ("_i", "ᵢ"),
    ("_j", "ⱼ"),
    ("_k", "ₖ"),
    ("_l", "ₗ"),
    ("_m", "ₘ"),
    ("_n", "ₙ"),
    ("_o", "ₒ"),
    ("_p", "ₚ"),
    ("_s", "ₛ"),
    ("_t", "ₜ"),
    ("_u", "ᵤ"),
    ("_v", "ᵥ"),
    ("_x", "ₓ"),
    ("cdot", "⋅"),
    ("nabla", "∇"),
    ("sqrt", "√"),
    ("+-", "±"),
    ("<=", "≤"),
    ("<=>", "⇔"),
    (">=", "≥"),
    ("1/2", "½"),
    ("1/3", "⅓"),
    ("1/4", "¼"),
    ("1/5", "⅕"),
    ("1/6", "⅙"),
    ("1/7", "⅐"),
    ("1/8", "⅛"),
    ("1/9", "⅑"),
    ("1/10", "⅒"),
    ("2/3", "⅔"),
    ("2/5", "⅖"),
    ("3/4", "¾"),
    ("3/5", "⅗"),
    ("3/8", "⅜"),
    ("4/5", "⅘"),
    ("5/6", "⅚"),
    ("5/8", "⅝"),
    ("7/8", "⅞"),
    ("heart", "❤️"),
    ("iheartla", "I❤️LA"),
    ("ihla", "I❤️LA"),
    ("le", "≤"),
    ("ge", "≥"),
    ("ne", "≠"),
    ("notin", "∉"),
    ("div", "÷"),
    ("nplus", "±"),
    ("linner", "⟨"),
    ("rinner", "⟩"),
    ("num1", "𝟙"),
    ("hat", "\u{0302}"),
    ("bar", "\u{0304}"),
];

static STANDARD: Lazy<SymbolTable> = Lazy::new(|| SymbolTable::from_entries(STANDARD_ENTRIES));

/// A single mnemonic and the glyph it expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolEntry {
    pub mnemonic: &'static str,
    pub glyph: &'static str,
}

/// Read-only lookup table with a stable enumeration order.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    by_mnemonic: HashMap<&'static str, usize>,
}

impl SymbolTable {
    /// The process-wide table, built on first use.
    pub fn standard() -> &'static SymbolTable {
        &STANDARD
    }

    /// Build a table from `(mnemonic, glyph)` pairs. A repeated mnemonic keeps its first
    /// position and glyph.
    pub fn from_entries(pairs: &[(&'static str, &'static str)]) -> Self {
        let mut entries = Vec::with_capacity(pairs.len());
        let mut by_mnemonic = HashMap::with_capacity(pairs.len());
        for &(mnemonic, glyph) in pairs {
            if by_mnemonic.contains_key(mnemonic) {
                continue;
            }
            by_mnemonic.insert(mnemonic, entries.len());
            entries.push(SymbolEntry { mnemonic, glyph });
        }
        Self {
            entries,
            by_mnemonic,
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, mnemonic: &str) -> Option<&'static str> {
        self.by_mnemonic
            .get(mnemonic)
            .map(|&idx| self.entries[idx].glyph)
    }

    /// Position of `mnemonic` in enumeration order.
    pub fn position(&self, mnemonic: &str) -> Option<usize> {
        self.by_mnemonic.get(mnemonic).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

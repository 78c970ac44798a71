use notate::substitution::{scan_and_substitute, substitute_all, token_for};
use notate::SymbolTable;
use proptest::prelude::*;
use rstest::rstest;

fn table() -> &'static SymbolTable {
    SymbolTable::standard()
}

#[rstest]
#[case("alpha", "α")]
#[case("sum", "∑")]
#[case("times", "×")]
#[case("dot", "⋅")]
#[case("had", "∘")]
#[case("kro", "⊗")]
#[case("le", "≤")]
#[case("ge", "≥")]
#[case("ne", "≠")]
#[case("u3", "₃")]
#[case("_9", "₉")]
#[case("s2", "²")]
#[case("^0", "⁰")]
#[case("_x", "ₓ")]
#[case("1/2", "½")]
#[case("7/8", "⅞")]
#[case("<=>", "⇔")]
#[case("s-1", "⁻¹")]
#[case("^-1", "⁻¹")]
#[case("nabla", "∇")]
fn single_token_is_replaced_by_its_glyph(#[case] mnemonic: &str, #[case] glyph: &str) {
    let text = format!("f(y) = {}z", token_for(mnemonic));
    let edit = scan_and_substitute(&text, table()).expect("edit for known mnemonic");

    assert_eq!(edit.mnemonic, mnemonic);
    assert_eq!(edit.glyph, glyph);
    assert_eq!(&text[edit.span.clone()], token_for(mnemonic));
    assert_eq!(edit.apply(&text), format!("f(y) = {glyph}z"));
}

#[test]
fn applied_edit_is_not_found_again() {
    let text = "a \\in A";
    let edit = scan_and_substitute(text, table()).unwrap();
    let applied = edit.apply(text);
    assert_eq!(applied, "a ∈A");
    assert_eq!(scan_and_substitute(&applied, table()), None);
}

#[test]
fn first_mnemonic_in_table_order_wins() {
    // "x" is enumerated before "theta" even though "\theta " occurs first
    let x = table().position("x").unwrap();
    let theta = table().position("theta").unwrap();
    assert!(x < theta);

    let text = "\\theta val \\x val";
    let edit = scan_and_substitute(text, table()).unwrap();
    assert_eq!(edit.mnemonic, "x");
    assert_eq!(&text[edit.span.clone()], "\\x ");
}

#[test]
fn one_as_a_key_precedes_fractions() {
    let edit = scan_and_substitute("\\1/2 and \\1 ", table()).unwrap();
    assert_eq!(edit.glyph, "𝟙");
    assert_eq!(edit.span, 9..12);
}

#[test]
fn longer_keys_are_not_shadowed_by_prefixes() {
    let edit = scan_and_substitute("x \\inf ", table()).unwrap();
    assert_eq!(edit.mnemonic, "inf");
    let edit = scan_and_substitute("x \\<=> y", table()).unwrap();
    assert_eq!(edit.mnemonic, "<=>");
}

#[test]
fn converged_buffer_snapshot() {
    let converted = substitute_all(
        "\\sum \\_i \\alpha \\_i \\x \\beta \\^T \\le \\1/2 \\R \\^2 ",
        table(),
    );
    insta::assert_snapshot!(converted, @"∑ᵢαᵢ×βᵀ≤½ℝ²");
}

fn mnemonic_strategy() -> impl Strategy<Value = &'static str> {
    let mnemonics: Vec<&'static str> = table().iter().map(|entry| entry.mnemonic).collect();
    proptest::sample::select(mnemonics)
}

proptest! {
    #[test]
    fn text_without_backslashes_never_produces_an_edit(text in "[^\\\\]*") {
        prop_assert!(scan_and_substitute(&text, table()).is_none());
    }

    #[test]
    fn lone_token_edit_spans_exactly_the_token(
        prefix in "[a-z ]{0,12}",
        suffix in "[a-z]{0,12}",
        mnemonic in mnemonic_strategy(),
    ) {
        let text = format!("{prefix}{}{suffix}", token_for(mnemonic));
        let edit = scan_and_substitute(&text, table()).unwrap();
        prop_assert_eq!(edit.mnemonic, mnemonic);
        prop_assert_eq!(edit.span.clone(), prefix.len()..prefix.len() + mnemonic.len() + 2);
        prop_assert_eq!(edit.range.start.character as usize, prefix.len());
        prop_assert_eq!(edit.glyph, table().lookup(mnemonic).unwrap());
    }

    #[test]
    fn substitute_all_leaves_no_tokens(text in "[a-z \\\\1/]{0,40}") {
        let converted = substitute_all(&text, table());
        prop_assert!(scan_and_substitute(&converted, table()).is_none());
    }
}

/// Separator placed between the bibliography blocks of consecutive collections
pub const BIB_SEPARATOR: &str = "\n\n";

/// Join per-collection biblatex bodies, keeping their order
///
/// Blocks are joined verbatim, so an empty collection contributes an empty
/// block rather than being dropped.
pub fn join_bib<S: AsRef<str>>(blocks: &[S]) -> String {
    blocks
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(BIB_SEPARATOR)
}

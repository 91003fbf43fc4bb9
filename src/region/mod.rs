pub(crate) mod algebra;
pub(crate) mod rect;

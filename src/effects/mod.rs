pub(crate) mod blur;
pub(crate) mod canvas;
pub(crate) mod mask;
pub(crate) mod order;

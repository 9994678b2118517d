pub(crate) mod decode;
pub(crate) mod manifest;
pub(crate) mod photo;
pub(crate) mod recolor;
pub(crate) mod source;
pub(crate) mod svg_raster;

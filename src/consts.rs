// The package-wide content types part
pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";

// The package-root relationships part, always regenerated rather than copied
pub const ROOT_RELS_PATH: &str = "_rels/.rels";

// The path to the vba file within a pptm or ppam file
pub const ZIP_VBA_PATH: &str = "ppt/vbaProject.bin";

// The path to the project stream within a VBA compound file
pub const PROJECT_PATH: &str = "/PROJECT";

// Custom UI parts injected by the rewriter
pub const CUSTOM_UI_DIR: &str = "customUI/";
pub const CUSTOM_UI_PATH: &str = "customUI/customUI14.xml";
pub const CUSTOM_UI_RELS_PATH: &str = "customUI/_rels/customUI14.xml.rels";
pub const CUSTOM_UI_IMAGES_DIR: &str = "customUI/images/";

// Namespaces
pub const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

// Relationship types
pub const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub const REL_THUMBNAIL: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/thumbnail";
pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const REL_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
pub const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
pub const REL_UI_EXTENSIBILITY: &str =
    "http://schemas.microsoft.com/office/2007/relationships/ui/extensibility";

// Prefix of the generated ui-extensibility relationship id
pub const UI_REL_ID_PREFIX: &str = "R";
// Number of random bytes hex encoded after the prefix
pub const UI_REL_ID_BYTES: usize = 8;

// Source module extensions that get imported, .frx form sidecars come in with their .frm
pub const MODULE_EXTENSIONS: [&str; 3] = ["bas", "cls", "frm"];

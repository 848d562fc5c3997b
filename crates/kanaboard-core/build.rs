use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Emit a `u16` newtype with name lookup, `From` conversions, `Display` and
/// `FromStr`, backed by the `$lookup` / `$parse` functions in key.rs.
fn write_code_type(
    f: &mut File,
    name: &str,
    doc: &str,
    lookup: &str,
    parse: &str,
) -> std::io::Result<()> {
    writeln!(
        f,
        r#"
/// {doc}
///
/// This is a newtype wrapper around u16 for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct {name}(pub u16);

impl {name} {{
    /// Get the raw numeric code value
    pub const fn code(self) -> u16 {{
        self.0
    }}

    /// Get the name of this code
    pub fn name(self) -> &'static str {{
        {lookup}(self.0)
    }}
}}

impl From<u16> for {name} {{
    fn from(code: u16) -> Self {{
        {name}(code)
    }}
}}

impl From<{name}> for u16 {{
    fn from(code: {name}) -> Self {{
        code.0
    }}
}}

impl fmt::Display for {name} {{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {{
        write!(f, "{{}}", self.name())
    }}
}}

impl FromStr for {name} {{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {{
        {parse}(s).ok_or_else(|| format!("Unknown {name}: {{}}", s))
    }}
}}
"#
    )
}

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("key_codes.rs");
    let mut f = File::create(&dest_path).unwrap();

    write_code_type(
        &mut f,
        "ScanCode",
        "Physical key position reported by a hardware keyboard.\n///\n/// The numeric values match Linux input-event-codes.h definitions, which\n/// is what the platform reports as the scan code of an attached keyboard.",
        "scan_code_name",
        "scan_code_from_name",
    )
    .unwrap();

    write_code_type(
        &mut f,
        "KeyCode",
        "Platform key code (the `KEYCODE_*` numbering of the host platform).",
        "key_code_name",
        "key_code_from_name",
    )
    .unwrap();

    println!("cargo:rerun-if-changed=build.rs");
}

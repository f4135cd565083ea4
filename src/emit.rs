//! C++ rendering of decoded classes.
//!
//! Every class becomes three symbols inside `namespace embedded`:
//! `<id>[]` holding the class file bytes, `<id>_size` and `<id>_name` (the
//! internal `a/b/C` form a JNI `DefineClass` call expects). The batch table
//! adds `classes`, `class_sizes`, `class_names` and `classes_count`.

use std::fmt::Write;

use jembed_class_file::ClassDescriptor;

use crate::EmbeddedClass;

/// Maps a qualified name onto a C++ identifier using JNI name mangling:
/// `.` becomes `_`, `_` becomes `_1`, `;` `_2`, `[` `_3`, and any other
/// character outside `[A-Za-z0-9]` becomes `_0xxxx` per UTF-16 unit.
/// `a.b.C$D` becomes `a_b_C_00024D`.
pub fn identifier(qualified_name: &str) -> String {
    let mut out = String::with_capacity(qualified_name.len());
    for c in qualified_name.chars() {
        match c {
            c if c.is_ascii_alphanumeric() => out.push(c),
            '.' | '/' => out.push('_'),
            '_' => out.push_str("_1"),
            ';' => out.push_str("_2"),
            '[' => out.push_str("_3"),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "_0{:04x}", unit);
                }
            }
        }
    }
    out
}

/// Escapes `"` and `\` for use inside a C string literal.
pub fn c_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn hex_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 6);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "0x{:02x}", b);
    }
    out
}

fn write_symbols(out: &mut String, indent: &str, class: &ClassDescriptor) -> std::fmt::Result {
    let id = identifier(&class.qualified_name);
    writeln!(
        out,
        "{}unsigned char {}[] = {{ {} }};",
        indent,
        id,
        hex_bytes(&class.raw_bytes)
    )?;
    writeln!(out, "{}unsigned int {}_size = {};", indent, id, class.raw_bytes.len())?;
    writeln!(
        out,
        "{}const char* {}_name = \"{}\";",
        indent,
        id,
        c_string(&class.internal_name())
    )
}

fn write_list(out: &mut String, declaration: &str, items: &[String]) -> std::fmt::Result {
    writeln!(out, "{} = {{", declaration)?;
    for item in items {
        writeln!(out, "    {},", item)?;
    }
    writeln!(out, "}};")?;
    writeln!(out)
}

fn write_table(out: &mut String, classes: &[EmbeddedClass]) -> std::fmt::Result {
    writeln!(out, "// Auto-generated C++ embedded Java classes")?;
    writeln!(out, "namespace embedded {{")?;

    let mut ids = Vec::with_capacity(classes.len());
    for EmbeddedClass { path, class } in classes {
        writeln!(out, "// Auto-generated from {}", path.display())?;
        writeln!(out, "// Class: {}", class.qualified_name)?;
        for method in &class.methods {
            writeln!(out, "// Method: {}", method)?;
        }
        writeln!(out)?;
        write_symbols(out, "", class)?;
        writeln!(out)?;
        ids.push(identifier(&class.qualified_name));
    }

    let with_suffix = |suffix: &str| {
        ids.iter()
            .map(|id| format!("{}{}", id, suffix))
            .collect::<Vec<_>>()
    };
    write_list(out, "unsigned char *classes[]", &ids)?;
    write_list(out, "unsigned int class_sizes[]", &with_suffix("_size"))?;
    write_list(out, "const char* class_names[]", &with_suffix("_name"))?;

    writeln!(out, "unsigned int classes_count = {};", ids.len())?;
    writeln!(out, "}}")
}

fn write_single(out: &mut String, class: &EmbeddedClass) -> std::fmt::Result {
    writeln!(out, "// Auto-generated from {}", class.path.display())?;
    writeln!(out, "// Class: {}", class.class.qualified_name)?;
    writeln!(out)?;
    writeln!(out, "namespace embedded {{")?;
    write_symbols(out, "    ", &class.class)?;
    writeln!(out, "}}")
}

/// One translation unit holding every class plus the lookup tables.
pub fn render_table(classes: &[EmbeddedClass]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_table(&mut out, classes);
    out
}

/// A standalone unit for a single class, without lookup tables.
pub fn render_single(class: &EmbeddedClass) -> String {
    let mut out = String::new();
    let _ = write_single(&mut out, class);
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use jembed_class_file::{AccessFlags, MethodDescriptor};

    use super::*;

    fn embedded(qualified_name: &str, raw_bytes: Vec<u8>) -> EmbeddedClass {
        EmbeddedClass {
            path: PathBuf::from(format!("build/java/{}.class", qualified_name.replace('.', "/"))),
            class: ClassDescriptor {
                qualified_name: qualified_name.to_owned(),
                methods: Vec::new(),
                raw_bytes,
            },
        }
    }

    #[test]
    fn it_should_turn_names_into_identifiers() {
        assert_eq!("a_b_C", identifier("a.b.C"));
        assert_eq!("a_b_C_00024Inner", identifier("a.b.C$Inner"));
        assert_eq!("my_1pkg_Main", identifier("my_pkg.Main"));
        assert_eq!("Main", identifier("Main"));
        assert_eq!("caf_000e9", identifier("caf\u{e9}"));
    }

    #[test]
    fn it_should_keep_inner_classes_apart_from_underscored_names() {
        let table = render_table(&[
            embedded("a.b.C$D", vec![0x01]),
            embedded("a.b.C_D", vec![0x02]),
        ]);

        assert_eq!(1, table.matches("unsigned char a_b_C_00024D[]").count());
        assert_eq!(1, table.matches("unsigned char a_b_C_1D[]").count());
        assert!(!table.contains("a_b_C_D[]"));
    }

    #[test]
    fn it_should_escape_quotes_and_backslashes_in_names() {
        assert_eq!("a/b\\\\c\\\"d", c_string("a/b\\c\"d"));

        let single = render_single(&embedded("odd.Na\"me", vec![0x01]));

        assert!(single.contains("_name = \"odd/Na\\\"me\";\n"));
    }

    #[test]
    fn it_should_render_lowercase_hex() {
        assert_eq!("0xca, 0xfe, 0x00, 0x0a", hex_bytes(&[0xca, 0xfe, 0x00, 0x0a]));
        assert_eq!("", hex_bytes(&[]));
    }

    #[test]
    fn it_should_render_an_empty_table() {
        assert_eq!(
            "// Auto-generated C++ embedded Java classes\n\
             namespace embedded {\n\
             unsigned char *classes[] = {\n\
             };\n\
             \n\
             unsigned int class_sizes[] = {\n\
             };\n\
             \n\
             const char* class_names[] = {\n\
             };\n\
             \n\
             unsigned int classes_count = 0;\n\
             }\n",
            render_table(&[])
        );
    }

    #[test]
    fn it_should_render_every_class_into_the_table() {
        let mut first = embedded("a.b.C", vec![0xca, 0xfe]);
        first.class.methods.push(MethodDescriptor {
            name: "run".into(),
            descriptor: "()V".into(),
            access: AccessFlags::PUBLIC,
        });
        let second = embedded("Main", vec![0x01]);

        let table = render_table(&[first, second]);

        assert!(table.contains(
            "// Auto-generated from build/java/a/b/C.class\n\
             // Class: a.b.C\n\
             // Method: run ()V [public]\n\
             \n\
             unsigned char a_b_C[] = { 0xca, 0xfe };\n\
             unsigned int a_b_C_size = 2;\n\
             const char* a_b_C_name = \"a/b/C\";\n"
        ));
        assert!(table.contains("unsigned char *classes[] = {\n    a_b_C,\n    Main,\n};\n"));
        assert!(table.contains("unsigned int class_sizes[] = {\n    a_b_C_size,\n    Main_size,\n};\n"));
        assert!(table.contains("const char* class_names[] = {\n    a_b_C_name,\n    Main_name,\n};\n"));
        assert!(table.ends_with("unsigned int classes_count = 2;\n}\n"));
    }

    #[test]
    fn it_should_render_a_single_class() {
        let class = embedded("a.b.C", vec![0xca, 0xfe, 0xba, 0xbe]);

        assert_eq!(
            "// Auto-generated from build/java/a/b/C.class\n\
             // Class: a.b.C\n\
             \n\
             namespace embedded {\n    \
             unsigned char a_b_C[] = { 0xca, 0xfe, 0xba, 0xbe };\n    \
             unsigned int a_b_C_size = 4;\n    \
             const char* a_b_C_name = \"a/b/C\";\n\
             }\n",
            render_single(&class)
        );
    }
}

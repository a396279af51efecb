// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_page(sections: usize) -> String {
    let mut content = String::new();

    for section in 0..sections {
        content.push_str(&format!("# Section {section}\n\n**Summary {section}**\n\n"));
        content.push_str("Paragraph with **bold**, __underline__, `code`, a [link](https://x.io) and [[Page|alias]].\n");
        content.push_str("Ping @someone by 2024-05-01 or mail someone@example.com.\n\n");
        content.push_str(&generate_list(3));
        content.push_str("> quoted line\n> > nested quote\n\n");
        if section % 3 == 0 {
            content.push_str("```rust\nfn example() {\n    // # not a heading\n    let s = \"**x**\";\n}\n```\n\n");
        }
        content.push_str("## Details\n\n![diagram](img.png)\n\n---\n\n");
    }

    content
}

#[allow(dead_code)]
pub fn generate_list(items: usize) -> String {
    let mut content = String::new();
    for i in 0..items {
        content.push_str(&format!("- [ ] task {i}\n  - bullet {i}\n{}. ordered {i}\n", i + 1));
    }
    content.push('\n');
    content
}

/// Roughly 22 lines per section.
#[allow(dead_code)]
pub fn generate_large_page() -> String {
    generate_page(1_000)
}

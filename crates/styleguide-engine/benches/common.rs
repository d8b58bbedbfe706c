use styleguide_engine::{Section, SourceFile};

/// `groups` top-level text references with `children` children each, listed
/// in reverse so the sort has work to do.
#[allow(dead_code)]
pub fn generate_sections(groups: usize, children: usize) -> Vec<Section> {
    let mut sections = Vec::new();
    for group in (0..groups).rev() {
        for child in (0..children).rev() {
            sections.push(Section {
                header: format!("Child {child}"),
                reference: format!("Group {group} - Child {child}"),
                weight: (child % 3) as i32,
                ..Section::default()
            });
        }
        sections.push(Section {
            header: format!("Group {group}"),
            reference: format!("Group {group}"),
            ..Section::default()
        });
    }
    sections
}

#[allow(dead_code)]
pub fn generate_stylesheets(files: usize, blocks: usize) -> Vec<SourceFile> {
    (0..files)
        .map(|file| {
            let mut contents = String::new();
            for block in 0..blocks {
                contents.push_str(&format!(
                    "// Block {block}\n//\n// Some *Markdown* text.\n//\n// .big - Bigger\n//\n// Styleguide File {file} - Block {block}\n.b{block} {{ color: red; }}\n\n"
                ));
            }
            SourceFile::new(format!("file{file}.scss"), contents)
        })
        .collect()
}

use std::io::Write;

#[derive(Default)]
struct TreeNode {
    name: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn find_or_create(&mut self, name: &str) -> &mut TreeNode {
        if let Some(idx) = self.children.iter().position(|c| c.name == name) {
            return &mut self.children[idx];
        }
        self.children.push(TreeNode {
            name: name.to_string(),
            children: Vec::new(),
        });
        self.children.last_mut().unwrap()
    }
}

/// Renders discovered directories as an indented tree. Paths from root,
/// recursion, and crawl sources are merged on the normalized key
/// (lowercased, trailing slashes trimmed).
pub fn print_tree(w: &mut dyn Write, dirs: &[String]) -> std::io::Result<()> {
    let mut normalized: Vec<String> = dirs
        .iter()
        .map(|d| d.trim_end_matches('/').to_lowercase())
        .filter(|d| !d.is_empty())
        .collect();
    normalized.sort();
    normalized.dedup();

    if normalized.is_empty() {
        return Ok(());
    }

    let mut root = TreeNode::default();
    for dir in &normalized {
        let mut node = &mut root;
        for part in dir.split('/') {
            node = node.find_or_create(part);
        }
    }

    writeln!(w, "\n  Discovered directories:")?;
    print_children(w, &root, "  ")
}

fn print_children(w: &mut dyn Write, node: &TreeNode, prefix: &str) -> std::io::Result<()> {
    for (i, child) in node.children.iter().enumerate() {
        let is_last = i == node.children.len() - 1;
        let connector = if is_last { "└── " } else { "├── " };
        writeln!(w, "{prefix}{connector}{}", child.name)?;
        let next_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        print_children(w, child, &next_prefix)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(dirs: &[&str]) -> String {
        let mut buf = Vec::new();
        let owned: Vec<String> = dirs.iter().map(|d| d.to_string()).collect();
        print_tree(&mut buf, &owned).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn nests_children_under_parents() {
        let out = render(&["admin", "admin/config", "js", "js/asset"]);
        let admin_pos = out.find("admin").unwrap();
        let config_pos = out.find("config").unwrap();
        assert!(admin_pos < config_pos);
        assert!(out.contains("└── "));
        assert!(out.contains("├── "));
    }

    #[test]
    fn merges_duplicate_casing_and_trailing_slashes() {
        let out = render(&["Admin/", "admin", "ADMIN/"]);
        assert_eq!(out.matches("admin").count(), 1);
    }

    #[test]
    fn empty_input_prints_nothing() {
        assert!(render(&[]).is_empty());
        assert!(render(&["/", ""]).is_empty());
    }
}

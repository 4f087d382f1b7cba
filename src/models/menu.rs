//! Navigation menus.

use serde::{Deserialize, Serialize};

/// Flat menu row as stored; `parent_id == 0` marks a top-level item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemRecord {
    pub id: i64,
    pub parent_id: i64,
    pub position: i64,
    pub title: String,
    pub url: String,
}

/// A node of the menu tree. Leaves carry no `children` field at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MenuNode>>,
}

/// Build the subtree below `parent_id` from a flat list, keeping input order among siblings.
pub fn build_menu_tree(items: &[MenuItemRecord], parent_id: i64) -> Vec<MenuNode> {
    items
        .iter()
        .filter(|item| item.parent_id == parent_id && item.id != parent_id)
        .map(|item| {
            let children = build_menu_tree(items, item.id);
            MenuNode {
                id: item.id,
                title: item.title.clone(),
                url: item.url.clone(),
                children: (!children.is_empty()).then_some(children),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, parent_id: i64) -> MenuItemRecord {
        MenuItemRecord {
            id,
            parent_id,
            position: id,
            title: format!("Item {}", id),
            url: format!("/item-{}", id),
        }
    }

    #[test]
    fn test_build_nested_tree() {
        let items = vec![item(1, 0), item(2, 1), item(3, 1), item(4, 2)];
        let tree = build_menu_tree(&items, 0);

        assert_eq!(tree.len(), 1);
        let root = &tree[0];
        assert_eq!(root.id, 1);

        let children = root.children.as_ref().unwrap();
        assert_eq!(children.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2, 3]);

        let grandchildren = children[0].children.as_ref().unwrap();
        assert_eq!(grandchildren.len(), 1);
        assert_eq!(grandchildren[0].id, 4);
        assert!(grandchildren[0].children.is_none());
        assert!(children[1].children.is_none());
    }

    #[test]
    fn test_leaf_serializes_without_children_key() {
        let tree = build_menu_tree(&[item(1, 0), item(2, 1)], 0);
        let json = serde_json::to_value(&tree).unwrap();

        assert!(json[0]["children"].is_array());
        assert!(json[0]["children"][0].get("children").is_none());
    }

    #[test]
    fn test_empty_and_orphaned_items() {
        assert!(build_menu_tree(&[], 0).is_empty());

        // Items whose parent is missing never surface at the root.
        let tree = build_menu_tree(&[item(1, 0), item(5, 99)], 0);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].children.is_none());
    }

    #[test]
    fn test_self_parented_root_does_not_recurse() {
        let tree = build_menu_tree(
            &[MenuItemRecord {
                id: 0,
                parent_id: 0,
                position: 0,
                title: "Loop".to_string(),
                url: "/".to_string(),
            }],
            0,
        );
        assert!(tree.is_empty());
    }
}

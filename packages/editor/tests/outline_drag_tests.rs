//! End-to-end outline drag scenarios: gesture → working copy → document
//! commit.

use lowpage_editor::{DragSession, DropTarget, PageDocument, RowBounds};
use lowpage_schema::{find_node, SchemaNode};

const ROW: RowBounds = RowBounds {
    top: 0.0,
    height: 20.0,
};

fn page(nodes: Vec<SchemaNode>) -> PageDocument {
    PageDocument::from_nodes("index", nodes).unwrap()
}

fn top_ids(doc: &PageDocument) -> Vec<&str> {
    doc.nodes().iter().map(|n| n.id.as_str()).collect()
}

#[test]
fn test_sibling_reorder_commits_through_document() {
    let mut doc = page(vec![
        SchemaNode::new("a", "Block"),
        SchemaNode::new("b", "Block"),
        SchemaNode::new("c", "Block"),
    ]);
    let version = doc.version();

    let mut drag = DragSession::begin("c", doc.nodes()).unwrap();
    drag.enter(DropTarget::Row {
        node_id: "a".to_string(),
    });
    drag.drag_move(4.0, ROW);

    let committed = drag.finish().unwrap();
    doc.commit_outline(committed).unwrap();

    assert_eq!(top_ids(&doc), vec!["c", "a", "b"]);
    assert_eq!(doc.version(), version + 1);
    assert!(doc.dirty());
}

#[test]
fn test_reparent_into_group_child_zone() {
    let mut doc = page(vec![
        SchemaNode::new("a", "Block"),
        SchemaNode::new("b", "Block"),
        SchemaNode::group("g", "Container").with_child(SchemaNode::new("g1", "Block")),
    ]);

    let mut drag = DragSession::begin("b", doc.nodes()).unwrap();
    drag.enter(DropTarget::ChildZone {
        group_id: "g".to_string(),
    });
    drag.drag_move(19.0, ROW);

    doc.commit_outline(drag.finish().unwrap()).unwrap();

    assert_eq!(top_ids(&doc), vec!["a", "g"]);
    let group = find_node(doc.nodes(), "g").unwrap();
    let children: Vec<&str> = group.child_nodes().map(|n| n.id.as_str()).collect();
    assert_eq!(children, vec!["g1", "b"]);
}

#[test]
fn test_noop_drop_commits_nothing() {
    let mut doc = page(vec![SchemaNode::new("a", "Block"), SchemaNode::new("b", "Block")]);
    let version = doc.version();

    // self-drop
    let mut drag = DragSession::begin("a", doc.nodes()).unwrap();
    drag.enter(DropTarget::Row {
        node_id: "a".to_string(),
    });
    drag.drag_move(2.0, ROW);
    assert!(drag.finish().is_none());

    // unresolved target
    let mut drag = DragSession::begin("a", doc.nodes()).unwrap();
    drag.enter(DropTarget::Other);
    drag.drag_move(2.0, ROW);
    assert!(drag.finish().is_none());

    assert_eq!(doc.version(), version);
    assert_eq!(top_ids(&doc), vec!["a", "b"]);
}

#[test]
fn test_committed_list_untouched_mid_drag() {
    let doc = page(vec![SchemaNode::new("a", "Block"), SchemaNode::new("b", "Block")]);

    let mut drag = DragSession::begin("b", doc.nodes()).unwrap();
    drag.enter(DropTarget::Row {
        node_id: "a".to_string(),
    });
    drag.drag_move(2.0, ROW);

    assert_eq!(top_ids(&doc), vec!["a", "b"]);
    assert_eq!(
        drag.working().iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
        vec!["b", "a"]
    );
}

#[test]
fn test_drag_never_duplicates_or_loses_ids() {
    let mut doc = page(vec![
        SchemaNode::new("a", "Block"),
        SchemaNode::group("g", "Container")
            .with_child(SchemaNode::new("g1", "Block"))
            .with_child(SchemaNode::new("g2", "Block")),
        SchemaNode::new("b", "Block"),
    ]);

    let mut ids_before = Vec::new();
    for node in doc.nodes() {
        node.collect_ids(&mut ids_before);
    }
    ids_before.sort();

    // pull g1 out of the group, drop after b
    let mut drag = DragSession::begin("g1", doc.nodes()).unwrap();
    drag.enter(DropTarget::Row {
        node_id: "b".to_string(),
    });
    drag.drag_move(18.0, ROW);
    doc.commit_outline(drag.finish().unwrap()).unwrap();

    let mut ids_after = Vec::new();
    for node in doc.nodes() {
        node.collect_ids(&mut ids_after);
    }
    ids_after.sort();

    assert_eq!(ids_after, ids_before);
    assert_eq!(ids_after.iter().filter(|id| *id == "g1").count(), 1);
    assert_eq!(top_ids(&doc), vec!["a", "g", "b", "g1"]);
}

#[test]
fn test_entering_collapsed_group_expands_it() {
    let mut group = SchemaNode::group("g", "Container");
    group.expanded = false;
    let doc = page(vec![SchemaNode::new("a", "Block"), group]);

    let mut drag = DragSession::begin("a", doc.nodes()).unwrap();
    drag.enter(DropTarget::ChildZone {
        group_id: "g".to_string(),
    });

    assert!(drag.placeholder_visible());
    assert!(find_node(drag.working(), "g").unwrap().expanded);
    // the committed tree is not expanded until the drop lands
    assert!(!find_node(doc.nodes(), "g").unwrap().expanded);
}

#[test]
fn test_document_rejects_truncated_commit() {
    let mut doc = page(vec![SchemaNode::new("a", "Block"), SchemaNode::new("b", "Block")]);

    // a buggy caller drops a node on the floor; the document refuses
    let truncated = vec![SchemaNode::new("a", "Block")];
    assert!(doc.commit_outline(truncated).is_err());
    assert_eq!(top_ids(&doc), vec!["a", "b"]);
}

use cgmath::{Matrix4, SquareMatrix, Vector3};
use scene_ngin::{
    Node, SceneError, SceneGraph,
    data_structures::node::{Cube, Transform},
};

mod common;
use crate::common::test_utils::{leaf, translation, unit_bbox, VisitRecorder};
use scene_ngin::Traversal;

#[test]
fn new_scene_is_empty_with_identity_matrices() {
    let scene = SceneGraph::new();
    assert!(scene.is_empty());
    assert_eq!(scene.roots().count(), 0);
    assert_eq!(scene.projection, Matrix4::identity());
    assert_eq!(scene.model_view, Matrix4::identity());
}

#[test]
fn roots_and_children_keep_insertion_order() {
    let mut scene = SceneGraph::new();
    let a = scene.add_node(leaf(1));
    let group = scene.add_node(Transform::new());
    let b = scene.add_node(leaf(2));
    let c = scene.add_child(group, leaf(3)).unwrap();
    let d = scene.add_child(group, leaf(4)).unwrap();

    assert_eq!(scene.root_ids(), &[a, group, b]);
    let children = scene.node(group).and_then(Node::as_transform).unwrap().children();
    assert_eq!(children, &[c, d]);
    assert_eq!(scene.parent(c), Some(group));
    assert_eq!(scene.parent(a), None);
    assert_eq!(scene.len(), 5);

    let mut recorder = VisitRecorder::new();
    recorder.traverse(&scene);
    let order: Vec<u64> = recorder.resources.iter().map(|r| r.0).collect();
    assert_eq!(order, vec![1, 3, 4, 2]);
}

#[test]
fn leaves_cannot_have_children() {
    let mut scene = SceneGraph::new();
    let cube = scene.add_node(Cube { geometry: leaf(1) });
    assert_eq!(
        scene.add_child(cube, leaf(2)),
        Err(SceneError::NotATransform(cube))
    );
    assert_eq!(scene.len(), 1);
}

#[test]
fn removed_ids_are_unknown() {
    let mut scene = SceneGraph::new();
    let group = scene.add_node(Transform::new());
    scene.remove(group).unwrap();

    assert_eq!(scene.add_child(group, leaf(1)), Err(SceneError::UnknownNode(group)));
    assert_eq!(scene.remove(group), Err(SceneError::UnknownNode(group)));
    assert!(scene.node(group).is_none());
}

#[test]
fn node_can_only_be_attached_once() {
    let mut scene = SceneGraph::new();
    let first = scene.add_node(Transform::new());
    let second = scene.add_node(Transform::new());
    let shared = scene.insert(leaf(1));

    scene.attach(first, shared).unwrap();
    assert_eq!(scene.attach(second, shared), Err(SceneError::AlreadyAttached(shared)));
    assert_eq!(scene.attach_root(shared), Err(SceneError::AlreadyAttached(shared)));
    assert_eq!(scene.attach_root(first), Err(SceneError::AlreadyAttached(first)));
}

#[test]
fn detached_nodes_are_not_visited() {
    let mut scene = SceneGraph::new();
    scene.add_node(leaf(1));
    let pending = scene.insert(leaf(2));

    let mut recorder = VisitRecorder::new();
    recorder.traverse(&scene);
    assert_eq!(recorder.resources.len(), 1);

    scene.attach_root(pending).unwrap();
    let mut recorder = VisitRecorder::new();
    recorder.traverse(&scene);
    assert_eq!(recorder.resources.len(), 2);
}

#[test]
fn attach_rejects_cycles() {
    let mut scene = SceneGraph::new();
    let outer = scene.insert(Transform::new());
    let inner = scene.add_child(outer, Transform::new()).unwrap();

    assert_eq!(
        scene.attach(inner, outer),
        Err(SceneError::Cycle { parent: inner, child: outer })
    );
    assert_eq!(
        scene.attach(outer, outer),
        Err(SceneError::Cycle { parent: outer, child: outer })
    );

    scene.attach_root(outer).unwrap();
    assert_eq!(scene.root_ids(), &[outer]);
}

#[test]
fn remove_drops_the_whole_subtree() {
    let mut scene = SceneGraph::new();
    let keep = scene.add_node(leaf(1));
    let group = scene.add_node(Transform::new());
    let nested = scene.add_child(group, Transform::new()).unwrap();
    let deep = scene.add_child(nested, leaf(2)).unwrap();
    scene.add_child(group, leaf(3)).unwrap();

    scene.remove(nested).unwrap();
    assert!(scene.node(deep).is_none());
    assert_eq!(scene.len(), 3);
    let children = scene.node(group).and_then(Node::as_transform).unwrap().children();
    assert_eq!(children.len(), 1);

    scene.remove(group).unwrap();
    assert_eq!(scene.root_ids(), &[keep]);
    assert_eq!(scene.len(), 1);
}

#[test]
fn transform_mut_edits_the_local_matrix() {
    let mut scene = SceneGraph::new();
    let group = scene.add_node(translation(1.0, 0.0, 0.0));
    scene
        .transform_mut(group)
        .unwrap()
        .apply(Matrix4::from_translation(Vector3::new(0.0, 2.0, 0.0)));

    let xform = scene.node(group).and_then(Node::as_transform).unwrap().xform;
    assert_eq!(xform, Matrix4::from_translation(Vector3::new(1.0, 2.0, 0.0)));

    let leaf_id = scene.add_child(group, leaf(1)).unwrap();
    assert_eq!(scene.transform_mut(leaf_id).err(), Some(SceneError::NotATransform(leaf_id)));
}

#[test]
fn bounds_covers_every_leaf() {
    let mut scene = SceneGraph::new();
    assert_eq!(scene.bounds(), Default::default());

    scene.add_node(leaf(1));
    assert_eq!(scene.bounds(), unit_bbox());
}

#[test]
fn cloned_groups_do_not_share_children() {
    let mut scene = SceneGraph::new();
    let group = scene.add_node(translation(1.0, 0.0, 0.0));
    let child = scene.add_child(group, leaf(7)).unwrap();

    let copy = scene.node(group).unwrap().clone();
    let dup = scene.add_node(copy);
    let dup_transform = scene.node(dup).and_then(Node::as_transform).unwrap();
    assert!(dup_transform.children().is_empty());
    assert_eq!(dup_transform.xform, Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0)));

    let mut recorder = VisitRecorder::new();
    recorder.traverse(&scene);
    assert_eq!(recorder.resources.len(), 1);

    scene.remove(dup).unwrap();
    assert!(scene.node(child).is_some());
    let children = scene.node(group).and_then(Node::as_transform).unwrap().children();
    assert_eq!(children, &[child]);

    let mut recorder = VisitRecorder::new();
    recorder.traverse(&scene);
    assert_eq!(recorder.resources.len(), 1);
}

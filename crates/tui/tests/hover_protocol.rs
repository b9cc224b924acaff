use otlog_core::layout::TooltipPlacement;
use otlog_core::{Operation, Relation};
use otlog_tui::hover::{HoverCoordinator, UnitId};
use otlog_tui::presentation::{OpenStatus, OperationUnit, TooltipContent};

fn op(id: &str, chain: &[&str]) -> Operation<String> {
    let mut op = Operation::new(id, "me", format!("payload {id}"));
    op.transformed_against = chain.iter().map(|s| s.to_string()).collect();
    op
}

fn render(payload: &String) -> String {
    payload.clone()
}

struct Tree {
    hover: HoverCoordinator,
    units: Vec<OperationUnit<String>>,
}

impl Tree {
    fn new(ops: &[Operation<String>]) -> Self {
        let hover = HoverCoordinator::new();
        let units = ops
            .iter()
            .enumerate()
            .map(|(i, op)| OperationUnit::new(UnitId(i), op, TooltipPlacement::Bottom, &hover))
            .collect();
        Self { hover, units }
    }

    fn enter(&mut self, i: usize) {
        self.units[i].pointer_enter(&mut self.hover, &render);
        self.settle();
    }

    fn leave(&mut self, i: usize) {
        self.units[i].pointer_leave(&mut self.hover);
        self.settle();
    }

    fn settle(&mut self) {
        for unit in &mut self.units {
            unit.observe(&self.hover);
        }
    }

    fn open_count(&self) -> usize {
        self.units.iter().filter(|u| u.is_open()).count()
    }
}

#[test]
fn interleaved_enters_never_open_two_units() {
    let ops: Vec<_> = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|id| op(id, &[]))
        .collect();
    let mut tree = Tree::new(&ops);

    // Enters without matching leaves, in a scrambled order, plus late
    // leaves from units that were already superseded.
    let script: &[(bool, usize)] = &[
        (true, 0),
        (true, 2),
        (true, 1),
        (false, 0),
        (true, 4),
        (false, 2),
        (true, 3),
        (true, 0),
        (false, 4),
        (true, 2),
    ];
    for &(enter, i) in script {
        if enter {
            tree.enter(i);
        } else {
            tree.leave(i);
        }
        assert!(tree.open_count() <= 1, "after {:?}", (enter, i));
    }
    assert_eq!(tree.open_count(), 1);
    assert!(tree.units[2].is_open());
    assert_eq!(tree.hover.publisher(), Some(UnitId(2)));
}

#[test]
fn closing_settles_only_after_the_slot_empties() {
    let ops = vec![op("a", &[]), op("b", &[]), op("c", &[])];
    let mut tree = Tree::new(&ops);

    tree.enter(0);
    tree.enter(1);
    assert_eq!(tree.units[0].status(), OpenStatus::Closing);

    // Stale leave from the superseded unit is a no-op.
    tree.leave(0);
    assert_eq!(tree.units[0].status(), OpenStatus::Closing);
    assert_eq!(tree.hover.publisher(), Some(UnitId(1)));

    tree.enter(2);
    assert_eq!(tree.units[0].status(), OpenStatus::Closing);
    assert_eq!(tree.units[1].status(), OpenStatus::Closing);

    tree.leave(2);
    assert!(tree.hover.hovered().is_none());
    assert!(
        tree.units
            .iter()
            .all(|unit| unit.status() == OpenStatus::Closed)
    );
}

#[test]
fn related_units_describe_their_depth_relative_to_the_hovered_one() {
    let ops = vec![
        op("x", &[]),
        op("x", &["y"]),
        op("x", &["y", "z"]),
        op("x", &["z"]),
        op("w", &["y"]),
    ];
    let mut tree = Tree::new(&ops);

    tree.enter(1);
    let tooltips: Vec<Option<TooltipContent>> = tree
        .units
        .iter()
        .map(|unit| unit.tooltip(&tree.hover))
        .collect();
    assert_eq!(
        tooltips,
        vec![
            Some(TooltipContent::Related(Relation::Ancestor(1))),
            Some(TooltipContent::Detail {
                revision: None,
                payload: "payload x".to_string(),
            }),
            Some(TooltipContent::Related(Relation::Descendant(1))),
            Some(TooltipContent::Related(Relation::DifferentlyTransformed)),
            None,
        ]
    );

    // Related units never publish.
    assert_eq!(tree.hover.publisher(), Some(UnitId(1)));
    assert_eq!(tree.open_count(), 1);
}

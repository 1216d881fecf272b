use smartsched_core::{
    assignment_cost, Algorithm, CostMatrix, CostModel, HungarianSolver, Priority, Schedule,
    SchedulerConfig, SchedulingDispatcher, SearchLimits, Task, User,
};

fn week() -> (Vec<Task>, User) {
    let tasks: Vec<Task> = serde_json::from_str(
        r#"[
            {"id": 10, "user_id": 1, "title": "Lab report", "priority": "high", "required_hours": 3.5},
            {"id": 11, "user_id": 1, "title": "Long run", "priority": "medium", "required_hours": 1.5, "category": "Running"},
            {"id": 12, "user_id": 1, "title": "Novel", "priority": "low", "required_hours": 2.0, "category": "reading"},
            {"id": 13, "user_id": 1, "title": "Groceries", "priority": 0, "required_hours": 1.0},
            {"id": 14, "user_id": 1, "title": "Thesis draft", "priority": 4, "required_hours": 6.0,
             "due_date": "2026-11-20T23:59:00Z"}
        ]"#,
    )
    .unwrap();
    let user = User::new(1, "ana").with_hobby("running").with_hobby("Reading");
    (tasks, user)
}

fn ids(tasks: &[Task]) -> Vec<u64> {
    tasks.iter().map(|t| t.id).collect()
}

#[test]
fn test_week_through_every_algorithm() {
    let (tasks, user) = week();
    let model = CostModel::default();
    let d = SchedulingDispatcher::default();

    let Schedule::Assignment(slots) = d.schedule(Algorithm::Hungarian, &tasks, &user, None).unwrap()
    else {
        panic!("expected an assignment");
    };
    let mut sorted = slots;
    sorted.sort_unstable();
    assert_eq!(sorted, (0..tasks.len()).collect::<Vec<_>>());

    let Schedule::Selection(picked) = d
        .schedule(Algorithm::BranchAndBound, &tasks, &user, Some(8.0))
        .unwrap()
    else {
        panic!("expected a selection");
    };
    let hours: f64 = picked.iter().map(|t| t.required_hours).sum();
    let value: u32 = picked.iter().map(|t| model.effective_priority(t, &user)).sum();
    assert!(hours <= 8.0);
    // Thesis (4) + run (2 with the hobby bonus) fit in 7.5h.
    assert_eq!(value, 6);

    let Schedule::Ordering(order) = d.schedule(Algorithm::AStar, &tasks, &user, None).unwrap()
    else {
        panic!("expected an ordering");
    };
    let mut seen = ids(&order);
    seen.sort_unstable();
    assert_eq!(seen, ids(&tasks));
    let total: f64 = order.iter().map(|t| model.effective_cost(t, &user)).sum();
    assert!((total - 12.0).abs() < 1e-9);
}

#[test]
fn test_multi_augmentation_matrix() {
    let m = CostMatrix::from_rows(vec![
        vec![1.0, 2.0, 3.0],
        vec![2.0, 4.0, 6.0],
        vec![3.0, 6.0, 9.0],
    ])
    .unwrap();
    let solver = HungarianSolver::new(CostModel::default());
    let a = solver.solve(&m).unwrap();
    assert_eq!(a, vec![2, 1, 0]);
    assert_eq!(assignment_cost(&m, &a), 10.0);
}

#[test]
fn test_knapsack_example_with_numeric_ranks() {
    let tasks = vec![
        Task::new(1, "a").with_priority(Priority::from_rank(3)).with_hours(4.0),
        Task::new(2, "b").with_priority(Priority::from_rank(2)).with_hours(3.0),
        Task::new(3, "c").with_priority(Priority::from_rank(5)).with_hours(5.0),
    ];
    let user = User::new(1, "ana");
    let d = SchedulingDispatcher::default();
    let Schedule::Selection(picked) = d
        .schedule_by_name("branch-and-bound", &tasks, &user, Some(7.0))
        .unwrap()
    else {
        panic!("expected a selection");
    };
    let value: u32 = picked.iter().map(|t| t.priority.rank()).sum();
    let hours: f64 = picked.iter().map(|t| t.required_hours).sum();
    assert_eq!(value, 5);
    assert!(hours <= 7.0);
}

#[test]
fn test_concurrent_calls_share_one_dispatcher() {
    let (tasks, user) = week();
    let d = SchedulingDispatcher::new(SchedulerConfig {
        limits: SearchLimits::with_max_expanded_nodes(10_000),
        ..SchedulerConfig::default()
    });
    let baseline: Vec<Schedule> = Algorithm::ALL
        .iter()
        .map(|&a| d.schedule(a, &tasks, &user, None).unwrap())
        .collect();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    Algorithm::ALL
                        .iter()
                        .map(|&a| d.schedule(a, &tasks, &user, None).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), baseline);
        }
    });
}

#[test]
fn test_hobby_bonus_settings_change_the_outcome() {
    let tasks = vec![
        Task::new(1, "chores").with_priority(Priority::MEDIUM).with_hours(2.0),
        Task::new(2, "climb").with_priority(Priority::LOW).with_hours(2.0).with_category("Climbing"),
    ];
    let user = User::new(1, "ana").with_hobby("climbing");

    let plain = SchedulingDispatcher::new(SchedulerConfig {
        cost_model: CostModel { hour_bonus: 0.0, priority_bonus: 0 },
        ..SchedulerConfig::default()
    });
    let boosted = SchedulingDispatcher::new(SchedulerConfig {
        cost_model: CostModel { hour_bonus: 1.0, priority_bonus: 2 },
        ..SchedulerConfig::default()
    });

    let pick = |d: &SchedulingDispatcher| match d
        .schedule(Algorithm::BranchAndBound, &tasks, &user, Some(2.0))
        .unwrap()
    {
        Schedule::Selection(t) => ids(&t),
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(pick(&plain), vec![1]);
    assert_eq!(pick(&boosted), vec![2]);
}

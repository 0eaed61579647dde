use matmul_tasks::{
    Matrix, MatmulError, Strategy, multiply, multiply_sequential, multiply_with_thread_pool,
    multiply_with_threads,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn assert_matrices_equal(expected: &Matrix, actual: &Matrix, name: &str) {
    assert_eq!(
        (expected.rows(), expected.cols()),
        (actual.rows(), actual.cols()),
        "{}: shape mismatch",
        name
    );
    for (i, (e, a)) in expected.as_slice().iter().zip(actual.as_slice()).enumerate() {
        assert_eq!(
            e,
            a,
            "{}: mismatch at ({}, {}): expected {}, got {}",
            name,
            i / expected.cols(),
            i % expected.cols(),
            e,
            a
        );
    }
}

fn pattern_matrix(rows: usize, cols: usize, modulus: i32) -> Matrix {
    let data = (0..rows * cols).map(|i| i as i32 % modulus).collect();
    Matrix::from_vec(rows, cols, data).unwrap()
}

fn run(strategy: Strategy, a: &Matrix, b: &Matrix, num_tasks: usize) -> Matrix {
    let mut c = Matrix::zeros(a.rows(), b.cols());
    multiply(strategy, a, b, &mut c, num_tasks).unwrap();
    c
}

// ============================================================
// Small known products
// ============================================================

#[test]
fn test_2x2_reference() {
    let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
    let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
    let expected = vec![vec![19, 22], vec![43, 50]];

    for tasks in 1..=4 {
        let mut c_threads = Matrix::zeros(2, 2);
        let mut c_pool = Matrix::zeros(2, 2);

        multiply_with_threads(&a, &b, &mut c_threads, tasks).unwrap();
        multiply_with_thread_pool(&a, &b, &mut c_pool, tasks).unwrap();

        assert_eq!(c_threads.to_rows(), expected, "threads, {} tasks", tasks);
        assert_eq!(c_pool.to_rows(), expected, "pool, {} tasks", tasks);
    }
}

#[test]
fn test_2x3_times_3x2() {
    let a = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    let b = Matrix::from_rows(vec![vec![7, 8], vec![9, 10], vec![11, 12]]).unwrap();

    for strategy in Strategy::ALL {
        let c = run(strategy, &a, &b, 3);
        assert_eq!(c.to_rows(), vec![vec![58, 64], vec![139, 154]], "{}", strategy);
    }
}

#[test]
fn test_sequential_reference() {
    let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
    let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();

    let c = multiply_sequential(&a, &b).unwrap();
    assert_eq!(c.to_rows(), vec![vec![19, 22], vec![43, 50]]);
}

// ============================================================
// Against the sequential reference
// ============================================================

#[test]
fn test_odd_sizes_match_sequential() {
    let test_sizes = [
        (1, 1, 1),
        (3, 3, 3),
        (5, 7, 3),
        (7, 3, 5),
        (11, 13, 17),
        (90, 90, 90),
    ];

    for (m, n, k) in test_sizes {
        let a = pattern_matrix(m, k, 10);
        let b = pattern_matrix(k, n, 7);
        let expected = multiply_sequential(&a, &b).unwrap();

        for tasks in [1, 2, 3, 7, 35] {
            for strategy in Strategy::ALL {
                let c = run(strategy, &a, &b, tasks);
                assert_matrices_equal(
                    &expected,
                    &c,
                    &format!("{}x{}x{} {} tasks={}", m, n, k, strategy, tasks),
                );
            }
        }
    }
}

#[test]
fn test_non_square_matrices() {
    let test_cases = [
        (32, 64, 48),  // wide result
        (64, 32, 48),  // tall result
        (48, 48, 100), // deep k
        (1, 50, 20),   // single row
        (50, 1, 20),   // single column
    ];

    for (m, n, k) in test_cases {
        let a = pattern_matrix(m, k, 10);
        let b = pattern_matrix(k, n, 10);
        let expected = multiply_sequential(&a, &b).unwrap();

        for strategy in Strategy::ALL {
            let c = run(strategy, &a, &b, 6);
            assert_matrices_equal(
                &expected,
                &c,
                &format!("non_square_{}x{}x{} {}", m, n, k, strategy),
            );
        }
    }
}

#[test]
fn test_single_task_matches_sequential() {
    let mut rng = StdRng::seed_from_u64(11);
    let a = Matrix::random(23, 19, &mut rng);
    let b = Matrix::random(19, 31, &mut rng);
    let expected = multiply_sequential(&a, &b).unwrap();

    for strategy in Strategy::ALL {
        assert_matrices_equal(&expected, &run(strategy, &a, &b, 1), "single_task");
    }
}

#[test]
fn test_negative_entries() {
    let a = Matrix::from_rows(vec![vec![-1, 2, -3], vec![4, -5, 6]]).unwrap();
    let b = Matrix::from_rows(vec![vec![7, -8], vec![-9, 10], vec![11, -12]]).unwrap();
    let expected = multiply_sequential(&a, &b).unwrap();
    assert_eq!(expected.to_rows(), vec![vec![-58, 64], vec![139, -154]]);

    for strategy in Strategy::ALL {
        assert_matrices_equal(&expected, &run(strategy, &a, &b, 4), "negative");
    }
}

// ============================================================
// Executor equivalence
// ============================================================

#[test]
fn test_executors_bit_identical() {
    for seed in 0..5u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let a = Matrix::random(40, 25, &mut rng);
        let b = Matrix::random(25, 40, &mut rng);

        for tasks in [1, 3, 16, 35, 64] {
            let c_threads = run(Strategy::ThreadPerTask, &a, &b, tasks);
            let c_pool = run(Strategy::Pool, &a, &b, tasks);
            assert_eq!(c_threads, c_pool, "seed={} tasks={}", seed, tasks);
        }
    }
}

#[test]
fn test_overwrites_previous_contents() {
    let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
    let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();

    for strategy in Strategy::ALL {
        let mut c = Matrix::from_rows(vec![vec![-1, -1], vec![-1, -1]]).unwrap();
        multiply(strategy, &a, &b, &mut c, 2).unwrap();
        assert_eq!(c.to_rows(), vec![vec![19, 22], vec![43, 50]], "{}", strategy);
    }
}

// ============================================================
// Oversubscription and degenerate shapes
// ============================================================

#[test]
fn test_more_tasks_than_cells() {
    let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
    let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();

    for tasks in [5, 17, 100] {
        for strategy in Strategy::ALL {
            let c = run(strategy, &a, &b, tasks);
            assert_eq!(
                c.to_rows(),
                vec![vec![19, 22], vec![43, 50]],
                "{} tasks={}",
                strategy,
                tasks
            );
        }
    }
}

#[test]
fn test_empty_output() {
    let a = Matrix::zeros(0, 3);
    let b = Matrix::zeros(3, 4);

    for strategy in Strategy::ALL {
        let c = run(strategy, &a, &b, 3);
        assert!(c.is_empty());
        assert_eq!((c.rows(), c.cols()), (0, 4));
    }
}

#[test]
fn test_empty_inner_dimension() {
    let a = Matrix::zeros(3, 0);
    let b = Matrix::zeros(0, 2);

    for strategy in Strategy::ALL {
        let mut c = Matrix::from_vec(3, 2, vec![9; 6]).unwrap();
        multiply(strategy, &a, &b, &mut c, 4).unwrap();
        assert_eq!(c.as_slice(), &[0; 6], "{}", strategy);
    }
}

// ============================================================
// Overflow wraps
// ============================================================

#[test]
fn test_overflow_wraps_identically() {
    let a = Matrix::from_vec(3, 4, vec![i32::MAX; 12]).unwrap();
    let b = Matrix::from_vec(4, 3, vec![i32::MAX; 12]).unwrap();

    // MAX * MAX wraps to 1; four of them sum to 4.
    let expected = multiply_sequential(&a, &b).unwrap();
    assert!(expected.as_slice().iter().all(|&v| v == 4));

    for strategy in Strategy::ALL {
        assert_matrices_equal(&expected, &run(strategy, &a, &b, 5), "overflow");
    }
}

// ============================================================
// Configuration errors
// ============================================================

#[test]
fn test_shape_mismatch_rejected() {
    let a = Matrix::zeros(2, 3);
    let b = Matrix::zeros(2, 3);

    for strategy in Strategy::ALL {
        let mut c = Matrix::zeros(2, 3);
        let err = multiply(strategy, &a, &b, &mut c, 2).unwrap_err();
        assert!(
            matches!(err, MatmulError::DimensionMismatch { m: 2, k: 3, k2: 2, n: 3 }),
            "{}: {:?}",
            strategy,
            err
        );
    }
    assert!(multiply_sequential(&a, &b).is_err());
}

#[test]
fn test_output_shape_rejected() {
    let a = Matrix::zeros(2, 3);
    let b = Matrix::zeros(3, 4);

    for strategy in Strategy::ALL {
        let mut c = Matrix::from_vec(4, 2, vec![5; 8]).unwrap();
        let err = multiply(strategy, &a, &b, &mut c, 2).unwrap_err();
        assert!(
            matches!(err, MatmulError::OutputShapeMismatch { .. }),
            "{}: {:?}",
            strategy,
            err
        );
        // rejected before any work: output untouched
        assert_eq!(c.as_slice(), &[5; 8]);
    }
}

#[test]
fn test_zero_tasks_rejected() {
    let a = Matrix::zeros(2, 2);
    let b = Matrix::zeros(2, 2);

    for strategy in Strategy::ALL {
        let mut c = Matrix::from_vec(2, 2, vec![1; 4]).unwrap();
        let err = multiply(strategy, &a, &b, &mut c, 0).unwrap_err();
        assert!(matches!(err, MatmulError::InvalidTaskCount(0)), "{}", strategy);
        assert_eq!(c.as_slice(), &[1; 4]);
    }
}

#[test]
fn test_error_messages() {
    assert_eq!(
        MatmulError::DimensionMismatch {
            m: 2,
            k: 3,
            k2: 4,
            n: 5
        }
        .to_string(),
        "matmul dimension mismatch: [2x3] @ [4x5]"
    );
    assert_eq!(
        MatmulError::InvalidTaskCount(0).to_string(),
        "task count must be at least 1, got 0"
    );
}

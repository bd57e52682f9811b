use parallel_matrix::bench::reference_product;
use parallel_matrix::comm::run_local;
use parallel_matrix::matrix::{
    cpu_matrix_multiply, generate_matrix, generate_square, parallel_matrix_multiply, read_from_file,
    write_to_file,
};
use parallel_matrix::{multiply_distributed, Communicator, Matrix};

#[test]
fn all_variants_match_reference() {
    for n in [1, 2, 5, 16, 17] {
        let a = generate_square(n, 100 + n as u64, -1000, 1000).unwrap();
        let b = generate_square(n, 200 + n as u64, -1000, 1000).unwrap();
        let expected = reference_product(&a, &b).unwrap();

        assert_eq!(cpu_matrix_multiply(&a, &b).unwrap(), expected);
        assert_eq!(parallel_matrix_multiply(&a, &b, 3).unwrap(), expected);
        for p in [1, 2, 3, 4] {
            let result = run_local(p, |comm| {
                let rank = comm.rank();
                multiply_distributed(&comm, &a, &b, rank, p).unwrap()
            })
            .unwrap()
            .remove(0);
            assert_eq!(result.as_ref(), Some(&expected), "n={} p={}", n, p);
        }
    }
}

#[test]
fn two_by_two_example_by_row_partition() {
    let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
    let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
    let expected = Matrix::from_rows(vec![vec![19, 22], vec![43, 50]]).unwrap();

    for p in [1, 2] {
        let result = run_local(p, |comm| {
            let rank = comm.rank();
            multiply_distributed(&comm, &a, &b, rank, p).unwrap()
        })
        .unwrap()
        .remove(0);
        assert_eq!(result, Some(expected.clone()));
    }
}

#[test]
fn rectangular_shapes_in_shared_memory_kernels() {
    let a = generate_matrix(7, 3, 1, -50, 50).unwrap();
    let b = generate_matrix(3, 9, 2, -50, 50).unwrap();
    let c = cpu_matrix_multiply(&a, &b).unwrap();
    assert_eq!((c.rows(), c.cols()), (7, 9));
    assert_eq!(parallel_matrix_multiply(&a, &b, 4).unwrap(), c);
    assert_eq!(reference_product(&a, &b).unwrap(), c);
}

#[test]
fn text_round_trip_of_generated_matrix() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("1_64.txt");
    let m = generate_square(64, 9, -1000, 1000).unwrap();
    write_to_file(&m, &path).unwrap();
    assert_eq!(read_from_file(&path).unwrap(), m);
}

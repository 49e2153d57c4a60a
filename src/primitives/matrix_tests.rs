pub(crate) use super::*;

#[test]
fn test_from_vec() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.shape(), (2, 3));
    assert!((m.get(0, 0) - 1.0).abs() < 1e-12);
    assert!((m.get(1, 2) - 6.0).abs() < 1e-12);
}

#[test]
fn test_from_vec_error() {
    let result = Matrix::from_vec(2, 3, vec![1.0_f64, 2.0, 3.0]);
    assert!(result.is_err());
}

#[test]
fn test_from_columns_interleaves() {
    let views = [10.0, 20.0, 30.0];
    let likes = [1.0, 2.0, 3.0];
    let m = Matrix::from_columns(&[&views, &likes]).expect("equal lengths");
    assert_eq!(m.shape(), (3, 2));
    assert_eq!(m.row(1), &[20.0, 2.0]);
    assert_eq!(m.column(1), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_from_columns_rejects_ragged() {
    let a = [1.0, 2.0];
    let b = [1.0];
    assert!(Matrix::from_columns(&[&a[..], &b[..]]).is_err());
    assert!(Matrix::<f64>::from_columns(&[]).is_err());
}

#[test]
fn test_zeros() {
    let m = Matrix::zeros(2, 3);
    assert_eq!(m.shape(), (2, 3));
    assert!(m.as_slice().iter().all(|&x| x == 0.0));
}

#[test]
fn test_set_get() {
    let mut m = Matrix::zeros(2, 2);
    m.set(1, 0, 4.5);
    assert!((m.get(1, 0) - 4.5).abs() < 1e-12);
}

#[test]
fn test_row_distance() {
    let m = Matrix::from_vec(2, 2, vec![0.0, 0.0, 3.0, 4.0]).expect("2x2");
    assert!((m.row_distance(0, 1) - 5.0).abs() < 1e-12);
    assert!(m.row_distance(1, 1).abs() < 1e-12);
}

#[test]
fn test_is_finite() {
    let mut m = Matrix::zeros(1, 2);
    assert!(m.is_finite());
    m.set(0, 1, f64::NAN);
    assert!(!m.is_finite());
}

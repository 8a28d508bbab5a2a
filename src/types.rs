use ndarray::{
    Array1,
    Array2,
};

pub type Result<T> = anyhow::Result<T>;

pub type Vector<T> = Array1<T>;  // Define this type to use broadcast operations.
pub type Matrix<T> = Array2<T>;  // [ienergy, icolumn], column 0 is always energy

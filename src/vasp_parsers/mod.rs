pub mod doscar;
pub mod poscar;

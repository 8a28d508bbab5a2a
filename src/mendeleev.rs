//! Mendeleev numbers (Pettifor ordering) of the elements.
//!
//! Used only to give species a stable display order and colour, never for physics.

use std::cmp::Ordering;


pub fn mendeleev_number(symbol: &str) -> Option<u32> {
    let n = match symbol {
        "Li" => 1,   "Na" => 2,   "K"  => 3,   "Rb" => 4,   "Cs" => 5,   "Fr" => 6,
        "Ca" => 7,   "Sr" => 8,   "Ba" => 9,   "Ra" => 10,  "Sc" => 11,  "Y"  => 12,
        "La" => 13,  "Ac" => 14,  "Ce" => 15,  "Th" => 16,  "Pr" => 17,  "Pa" => 18,
        "Nd" => 19,  "U"  => 20,  "Pm" => 21,  "Np" => 22,  "Sm" => 23,  "Pu" => 24,
        "Eu" => 25,  "Am" => 26,  "Gd" => 27,  "Cm" => 28,  "Tb" => 29,  "Bk" => 30,
        "Dy" => 31,  "Cf" => 32,  "Ho" => 33,  "Es" => 34,  "Er" => 35,  "Fm" => 36,
        "Tm" => 37,  "Md" => 38,  "Yb" => 39,  "No" => 40,  "Lu" => 41,  "Lr" => 42,
        "Ti" => 43,  "Zr" => 44,  "Hf" => 45,  "V"  => 46,  "Nb" => 47,  "Ta" => 48,
        "Cr" => 49,  "Mo" => 50,  "W"  => 51,  "Mn" => 52,  "Tc" => 53,  "Re" => 54,
        "Fe" => 55,  "Ru" => 56,  "Os" => 57,  "Co" => 58,  "Rh" => 59,  "Ir" => 60,
        "Ni" => 61,  "Pd" => 62,  "Pt" => 63,  "Cu" => 64,  "Ag" => 65,  "Au" => 66,
        "Be" => 67,  "Mg" => 68,  "Zn" => 69,  "Cd" => 70,  "Hg" => 71,  "B"  => 72,
        "Al" => 73,  "Ga" => 74,  "In" => 75,  "Tl" => 76,  "C"  => 77,  "Si" => 78,
        "Ge" => 79,  "Sn" => 80,  "Pb" => 81,  "N"  => 82,  "P"  => 83,  "As" => 84,
        "Sb" => 85,  "Bi" => 86,  "O"  => 87,  "S"  => 88,  "Se" => 89,  "Te" => 90,
        "Po" => 91,  "H"  => 92,  "F"  => 93,  "Cl" => 94,  "Br" => 95,  "I"  => 96,
        "At" => 97,  "He" => 98,  "Ne" => 99,  "Ar" => 100, "Kr" => 101, "Xe" => 102,
        "Rn" => 103,
        _ => return None,
    };
    Some(n)
}


/// Order two symbols by Mendeleev number, unknown symbols last.
pub fn cmp_symbols(a: &str, b: &str) -> Ordering {
    let rank = |s: &str| mendeleev_number(s).unwrap_or(u32::MAX);
    rank(a).cmp(&rank(b))
}


/// Stable sort by Mendeleev number of the symbol picked by `key`.
///
/// Items with unknown symbols keep their relative order at the tail.
pub fn sort_by_rank<T>(items: &mut [T], key: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| cmp_symbols(key(a), key(b)));
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mendeleev_number() {
        assert_eq!(mendeleev_number("Li"), Some(1));
        assert_eq!(mendeleev_number("Fe"), Some(55));
        assert_eq!(mendeleev_number("O"),  Some(87));
        assert_eq!(mendeleev_number("Rn"), Some(103));
        assert_eq!(mendeleev_number("Xx"), None);
        assert_eq!(mendeleev_number("fe"), None);
    }

    #[test]
    fn test_sort_by_rank() {
        let mut v = vec!["O", "Zz", "H", "Fe", "Aa", "Li"];
        sort_by_rank(&mut v, |s| *s);
        assert_eq!(v, vec!["Li", "Fe", "O", "H", "Zz", "Aa"]);
    }
}

/// Entry type predicates shared by type flags and headers.
pub trait IsTypeTrait {
    // Tells if the entry is a regular file.
    fn is_regular_file(&self) -> bool;
    // Tells if the entry is a hard link.
    fn is_hard_link(&self) -> bool;
    // Tells if the entry is a symbolic link.
    fn is_symbolic_link(&self) -> bool;
    // Tells if the entry is a directory.
    fn is_directory(&self) -> bool;
}

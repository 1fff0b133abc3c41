pub mod tokener;

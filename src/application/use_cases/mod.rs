pub mod crosswalk_loader;

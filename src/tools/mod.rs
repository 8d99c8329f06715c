// bring in each tool’s submodule:
pub mod box_tool;

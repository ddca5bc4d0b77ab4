pub mod frame_loop;
pub mod system_order;

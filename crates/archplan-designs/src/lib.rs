//! ArchPlan 设计集
//!
//! 每个设计都是无参数（或只接受少量参数）的纯函数，返回组装好的根模型：
//! - [`hunter::apartment`]：4251 Hunter 公寓平面图
//! - [`dream::plan`]：黄金比例平面草图
//! - [`dream::house`]：3D住宅体块

pub mod dream;
pub mod hunter;

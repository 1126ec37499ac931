//! Fixed menus offered to the presentation layer.

use strum::IntoEnumIterator;

use crate::parser::ListingLayout;
use crate::query::{Category, SortKey};

pub const TAGS: &[&str] = &[
    "数组", "字符串", "哈希表", "数学", "动态规划", "排序",
    "贪心", "深度优先搜索", "二分查找", "数据库", "树",
    "位运算", "矩阵", "广度优先搜索", "双指针", "前缀和",
    "堆（优先队列）", "二叉树", "模拟", "栈", "图", "计数",
    "滑动窗口", "设计", "枚举", "回溯", "链表", "并查集",
    "数论", "有序集合", "线段树", "单调栈", "分治", "字典树",
    "递归", "组合数学", "状态压缩", "队列", "二叉搜索树",
    "几何", "记忆化搜索", "树状数组", "哈希函数", "拓扑排序",
    "最短路", "字符串匹配", "滚动哈希", "博弈", "数据流",
    "交互", "单调队列", "脑筋急转弯", "双向链表", "归并排序",
    "随机化", "快速选择", "计数排序", "迭代器", "概率与统计",
    "多线程", "扫描线", "后缀数组", "桶排序", "最小生成树",
    "Shell", "水塘抽样", "强连通分量", "欧拉回路", "基数排序",
    "双连通分量", "拒绝采样",
];

/// Built-in categories followed by every catalogued tag, in menu order.
pub fn categories() -> Vec<Category> {
    Category::builtin()
        .into_iter()
        .chain(TAGS.iter().map(|tag| Category::Tag((*tag).to_string())))
        .collect()
}

pub fn category_names() -> Vec<String> {
    categories().iter().map(ToString::to_string).collect()
}

/// Sort keys that make sense for listings in `layout`.
pub fn sort_keys(layout: ListingLayout) -> Vec<SortKey> {
    SortKey::iter().filter(|key| key.applies_to(layout)).collect()
}

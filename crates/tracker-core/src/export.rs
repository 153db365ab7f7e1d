use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;
use crate::store::ProductStore;

/// 导出的数据文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub file_name: String,
    pub body: String,
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("resell-data-{}.json", date.format("%Y-%m-%d"))
}

/// 把当前全部商品导出为格式化的 JSON 数组
pub fn export_store(store: &ProductStore, date: NaiveDate) -> Result<ExportFile> {
    let body = serde_json::to_string_pretty(store.records())?;
    Ok(ExportFile {
        file_name: export_file_name(date),
        body,
    })
}

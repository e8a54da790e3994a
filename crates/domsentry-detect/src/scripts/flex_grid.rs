//! Driver script for the flex/grid layout detector.

pub const FLEX_GRID_CONTAINERS_SCRIPT: &str = r#"
(() => {
  const out = [];
  const all = document.querySelectorAll('*');
  for (const el of all) {
    const style = getComputedStyle(el);
    const display = style.display;
    const classMatches = String(el.className || '').toLowerCase();
    const isFlex = display === 'flex' || display === 'inline-flex' || classMatches.includes('flex');
    const isGrid = display === 'grid' || display === 'inline-grid' || classMatches.includes('grid');
    if (!isFlex && !isGrid) continue;

    const rect = el.getBoundingClientRect();
    if (rect.width === 0 || rect.height === 0) continue;
    if (style.visibility === 'hidden' || style.display === 'none') continue;

    const children = Array.from(el.children).map((child) => {
      const cRect = child.getBoundingClientRect();
      const cStyle = getComputedStyle(child);
      return {
        selector: child.tagName.toLowerCase() + (child.className ? '.' + String(child.className).split(' ').join('.') : ''),
        bounds: { x: cRect.left, y: cRect.top, width: cRect.width, height: cRect.height },
        flexShrink: parseFloat(cStyle.flexShrink) || 0,
        flexGrow: parseFloat(cStyle.flexGrow) || 0,
      };
    });
    if (children.length === 0) continue;

    out.push({
      selector: el.tagName.toLowerCase() + (el.className ? '.' + String(el.className).split(' ').join('.') : ''),
      bounds: { x: rect.left, y: rect.top, width: rect.width, height: rect.height },
      isFlex,
      isGrid,
      flexDirection: isFlex ? (style.flexDirection || null) : null,
      flexWrap: isFlex ? (style.flexWrap || null) : null,
      gridTemplateColumns: isGrid ? (style.gridTemplateColumns === 'none' ? null : style.gridTemplateColumns) : null,
      gridTemplateRows: isGrid ? (style.gridTemplateRows === 'none' ? null : style.gridTemplateRows) : null,
      gap: style.gap && style.gap !== 'normal' ? style.gap : null,
      rowGap: style.rowGap && style.rowGap !== 'normal' ? style.rowGap : null,
      columnGap: style.columnGap && style.columnGap !== 'normal' ? style.columnGap : null,
      overflowHidden: style.overflow === 'hidden' || style.overflowX === 'hidden' || style.overflowY === 'hidden',
      children,
    });
  }
  return out;
})()
"#;

//! Driver script for the container-overflow detector.

pub const CONTAINER_PAIRS_SCRIPT: &str = r#"
(() => {
  const CONTAINERS = ['div', 'section', 'article', 'main', 'aside', 'header', 'footer', 'nav', 'form', 'ul', 'ol', 'table', 'tr', 'td', 'th'];
  const out = [];
  let vdaIndex = 0;

  for (const tag of CONTAINERS) {
    for (const parent of document.getElementsByTagName(tag)) {
      const parentRect = parent.getBoundingClientRect();
      if (parentRect.width < 20 || parentRect.height < 20) continue;
      const parentStyle = getComputedStyle(parent);
      if (parentStyle.display === 'none' || parentStyle.visibility === 'hidden') continue;
      if (parentStyle.overflow === 'scroll' || parentStyle.overflow === 'auto') continue;

      for (const child of parent.children) {
        const childRect = child.getBoundingClientRect();
        if (childRect.width < 20 || childRect.height < 20) continue;
        const childStyle = getComputedStyle(child);
        if (childStyle.display === 'none' || childStyle.visibility === 'hidden') continue;

        child.setAttribute('data-vda-index', String(vdaIndex++));

        out.push({
          parentSelector: parent.tagName.toLowerCase() + (parent.className ? '.' + String(parent.className).split(' ').join('.') : ''),
          childSelector: child.tagName.toLowerCase() + (child.className ? '.' + String(child.className).split(' ').join('.') : ''),
          parent: { x: parentRect.left, y: parentRect.top, width: parentRect.width, height: parentRect.height },
          child: { x: childRect.left, y: childRect.top, width: childRect.width, height: childRect.height },
        });
      }
    }
  }
  return out;
})()
"#;
